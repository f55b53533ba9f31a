// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation repository.
//!
//! Status transitions are conditional on the row still being `pending`, so a
//! token can be resolved at most once even under concurrent requests.

use async_trait::async_trait;
use chrono::Utc;
use eventdesk_auth::{Invitation, InvitationId, InvitationStatus, TenantId, TenantRole, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_enum, parse_id, parse_optional_timestamp, parse_timestamp};
use crate::tenant::upsert_member_on;

#[async_trait]
pub trait InvitationStore: Send + Sync {
	async fn create_invitation(&self, invitation: &Invitation) -> Result<(), DbError>;
	async fn get_invitation_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DbError>;
	async fn get_invitation_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Invitation>, DbError>;
	async fn list_pending_invitations(&self, tenant_id: &TenantId)
		-> Result<Vec<Invitation>, DbError>;
	async fn accept_invitation(&self, id: &InvitationId, user_id: &UserId) -> Result<bool, DbError>;
	async fn decline_invitation(&self, id: &InvitationId) -> Result<bool, DbError>;
	async fn expire_invitation(&self, id: &InvitationId) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct InvitationRepository {
	pool: SqlitePool,
}

impl InvitationRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert an invitation.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` on a duplicate token hash.
	#[tracing::instrument(skip(self, invitation), fields(invitation_id = %invitation.id, tenant_id = %invitation.tenant_id, role = %invitation.role))]
	pub async fn create_invitation(&self, invitation: &Invitation) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO invitations (id, tenant_id, email, role, status, invited_by, token_hash, created_at, expires_at, resolved_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(invitation.id.to_string())
		.bind(invitation.tenant_id.to_string())
		.bind(&invitation.email)
		.bind(invitation.role.to_string())
		.bind(invitation.status.to_string())
		.bind(invitation.invited_by.to_string())
		.bind(&invitation.token_hash)
		.bind(invitation.created_at.to_rfc3339())
		.bind(invitation.expires_at.to_rfc3339())
		.bind(invitation.resolved_at.map(|d| d.to_rfc3339()))
		.execute(&self.pool)
		.await?;

		tracing::debug!(invitation_id = %invitation.id, tenant_id = %invitation.tenant_id, "invitation created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(invitation_id = %id))]
	pub async fn get_invitation_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, tenant_id, email, role, status, invited_by, token_hash, created_at, expires_at, resolved_at
			FROM invitations
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_invitation(&r)).transpose()
	}

	/// Get an invitation by the SHA-256 hash of its token.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_invitation_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Invitation>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, tenant_id, email, role, status, invited_by, token_hash, created_at, expires_at, resolved_at
			FROM invitations
			WHERE token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		let result = row.map(|r| self.row_to_invitation(&r)).transpose()?;
		if let Some(ref inv) = result {
			tracing::debug!(invitation_id = %inv.id, tenant_id = %inv.tenant_id, "invitation found by token hash");
		}
		Ok(result)
	}

	#[tracing::instrument(skip(self), fields(tenant_id = %tenant_id))]
	pub async fn list_pending_invitations(
		&self,
		tenant_id: &TenantId,
	) -> Result<Vec<Invitation>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, tenant_id, email, role, status, invited_by, token_hash, created_at, expires_at, resolved_at
			FROM invitations
			WHERE tenant_id = ? AND status = 'pending'
			ORDER BY created_at ASC
			"#,
		)
		.bind(tenant_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_invitation(r)).collect()
	}

	/// Accept a pending invitation and grant its role to `user_id`.
	///
	/// Both writes happen in one transaction. The membership is upserted, so a
	/// user invited twice ends up with a single entry carrying the latest role.
	///
	/// # Returns
	/// `false` if the invitation was not pending (already resolved or raced).
	#[tracing::instrument(skip(self), fields(invitation_id = %id, user_id = %user_id))]
	pub async fn accept_invitation(&self, id: &InvitationId, user_id: &UserId) -> Result<bool, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(
			r#"
			UPDATE invitations
			SET status = 'accepted', resolved_at = ?
			WHERE id = ? AND status = 'pending'
			RETURNING tenant_id, role
			"#,
		)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.fetch_optional(&mut *tx)
		.await?;

		let Some(row) = row else {
			tx.rollback().await?;
			return Ok(false);
		};

		let tenant_id = TenantId::new(parse_id(&row, "tenant_id")?);
		let role: TenantRole = parse_enum(&row, "role")?;
		upsert_member_on(&mut *tx, &tenant_id, user_id, role).await?;

		tx.commit().await?;

		tracing::debug!(invitation_id = %id, tenant_id = %tenant_id, user_id = %user_id, "invitation accepted");
		Ok(true)
	}

	/// # Returns
	/// `false` if the invitation was not pending.
	#[tracing::instrument(skip(self), fields(invitation_id = %id))]
	pub async fn decline_invitation(&self, id: &InvitationId) -> Result<bool, DbError> {
		let updated = self
			.resolve_pending(id, InvitationStatus::Declined)
			.await?;
		if updated {
			tracing::debug!(invitation_id = %id, "invitation declined");
		}
		Ok(updated)
	}

	/// Persist expiry of a pending invitation.
	#[tracing::instrument(skip(self), fields(invitation_id = %id))]
	pub async fn expire_invitation(&self, id: &InvitationId) -> Result<bool, DbError> {
		let updated = self.resolve_pending(id, InvitationStatus::Expired).await?;
		if updated {
			tracing::debug!(invitation_id = %id, "invitation expired");
		}
		Ok(updated)
	}

	async fn resolve_pending(
		&self,
		id: &InvitationId,
		status: InvitationStatus,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE invitations
			SET status = ?, resolved_at = ?
			WHERE id = ? AND status = 'pending'
			"#,
		)
		.bind(status.to_string())
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	fn row_to_invitation(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Invitation, DbError> {
		Ok(Invitation {
			id: InvitationId::new(parse_id(row, "id")?),
			tenant_id: TenantId::new(parse_id(row, "tenant_id")?),
			email: row.get("email"),
			role: parse_enum(row, "role")?,
			status: parse_enum(row, "status")?,
			invited_by: UserId::new(parse_id(row, "invited_by")?),
			token_hash: row.get("token_hash"),
			created_at: parse_timestamp(row, "created_at")?,
			expires_at: parse_timestamp(row, "expires_at")?,
			resolved_at: parse_optional_timestamp(row, "resolved_at")?,
		})
	}
}

#[async_trait]
impl InvitationStore for InvitationRepository {
	async fn create_invitation(&self, invitation: &Invitation) -> Result<(), DbError> {
		self.create_invitation(invitation).await
	}

	async fn get_invitation_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DbError> {
		self.get_invitation_by_id(id).await
	}

	async fn get_invitation_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<Invitation>, DbError> {
		self.get_invitation_by_token_hash(token_hash).await
	}

	async fn list_pending_invitations(
		&self,
		tenant_id: &TenantId,
	) -> Result<Vec<Invitation>, DbError> {
		self.list_pending_invitations(tenant_id).await
	}

	async fn accept_invitation(&self, id: &InvitationId, user_id: &UserId) -> Result<bool, DbError> {
		self.accept_invitation(id, user_id).await
	}

	async fn decline_invitation(&self, id: &InvitationId) -> Result<bool, DbError> {
		self.decline_invitation(id).await
	}

	async fn expire_invitation(&self, id: &InvitationId) -> Result<bool, DbError> {
		self.expire_invitation(id).await
	}
}
