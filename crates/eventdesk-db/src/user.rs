// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.
//!
//! Users are owned by the authentication subsystem. This repository stores the
//! fields the authorization layer needs and enforces nothing about ownership;
//! callers check that a user owns no tenants before deleting them.

use async_trait::async_trait;
use eventdesk_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_id, parse_timestamp};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` on a duplicate id or email.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		let roles = serde_json::to_string(&user.roles)?;
		sqlx::query(
			r#"
			INSERT INTO users (id, email, display_name, roles, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.display_name)
		.bind(roles)
		.bind(user.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, display_name, roles, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_user(&r)).transpose()
	}

	/// Delete a user together with their memberships and sessions.
	///
	/// # Returns
	/// `false` if no such user exists.
	///
	/// # Errors
	/// Fails with a foreign key violation if the user still owns a tenant.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		let id_str = id.to_string();
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM tenant_members WHERE user_id = ?")
			.bind(&id_str)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM sessions WHERE user_id = ?")
			.bind(&id_str)
			.execute(&mut *tx)
			.await?;
		let result = sqlx::query("DELETE FROM users WHERE id = ?")
			.bind(&id_str)
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(user_id = %id, "user deleted");
		}
		Ok(deleted)
	}

	fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
		let roles: String = row.get("roles");
		Ok(User {
			id: UserId::new(parse_id(row, "id")?),
			email: row.get("email"),
			display_name: row.get("display_name"),
			roles: serde_json::from_str(&roles)?,
			created_at: parse_timestamp(row, "created_at")?,
		})
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		self.delete_user(id).await
	}
}
