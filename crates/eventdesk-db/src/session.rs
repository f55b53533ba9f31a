// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository.

use async_trait::async_trait;
use chrono::Utc;
use eventdesk_auth::{Session, SessionId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_id, parse_timestamp};

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(&self, session: &Session) -> Result<(), DbError>;
	async fn get_active_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Session>, DbError>;
	async fn delete_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
	pub async fn create_session(&self, session: &Session) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(&session.token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(session_id = %session.id, "session created");
		Ok(())
	}

	/// Look up a session by token hash, ignoring expired sessions.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_active_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Session>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, token_hash, created_at, expires_at
			FROM sessions
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};
		let session = self.row_to_session(&row)?;
		if session.is_expired_at(Utc::now()) {
			tracing::debug!(session_id = %session.id, "session expired");
			return Ok(None);
		}
		Ok(Some(session))
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn delete_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected())
	}

	fn row_to_session(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Session, DbError> {
		Ok(Session {
			id: SessionId::new(parse_id(row, "id")?),
			user_id: UserId::new(parse_id(row, "user_id")?),
			token_hash: row.get("token_hash"),
			created_at: parse_timestamp(row, "created_at")?,
			expires_at: parse_timestamp(row, "expires_at")?,
		})
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(&self, session: &Session) -> Result<(), DbError> {
		self.create_session(session).await
	}

	async fn get_active_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Session>, DbError> {
		self.get_active_session_by_token_hash(token_hash).await
	}

	async fn delete_sessions_for_user(&self, user_id: &UserId) -> Result<u64, DbError> {
		self.delete_sessions_for_user(user_id).await
	}
}
