// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant repository.
//!
//! Organizations and teams share the `tenants` table, tagged by `kind`.
//! Non-owner members live in `tenant_members`, keyed by `(tenant_id, user_id)`
//! so a user holds at most one role per tenant.

use async_trait::async_trait;
use chrono::Utc;
use eventdesk_auth::{Membership, Tenant, TenantId, TenantKind, TenantRole, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{parse_enum, parse_id, parse_timestamp};

#[async_trait]
pub trait TenantStore: Send + Sync {
	async fn create_tenant(&self, tenant: &Tenant) -> Result<(), DbError>;
	async fn get_tenant(&self, id: &TenantId) -> Result<Option<Tenant>, DbError>;
	async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DbError>;
	async fn delete_tenant(&self, id: &TenantId) -> Result<bool, DbError>;
	async fn list_owned_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError>;
	async fn list_member_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError>;
	async fn count_owned_tenants(&self, user_id: &UserId) -> Result<i64, DbError>;
	async fn upsert_member(
		&self,
		tenant_id: &TenantId,
		user_id: &UserId,
		role: TenantRole,
	) -> Result<(), DbError>;
	async fn remove_member(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<bool, DbError>;
	async fn transfer_ownership(
		&self,
		tenant_id: &TenantId,
		new_owner: &UserId,
	) -> Result<(), DbError>;
}

/// Repository for tenant database operations.
#[derive(Clone)]
pub struct TenantRepository {
	pool: SqlitePool,
}

impl TenantRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Tenant CRUD
	// =========================================================================

	/// Create a tenant and any members it already carries.
	#[tracing::instrument(skip(self, tenant), fields(tenant_id = %tenant.id, kind = %tenant.kind))]
	pub async fn create_tenant(&self, tenant: &Tenant) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO tenants (id, kind, name, owner_id, pricing_plan, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(tenant.id.to_string())
		.bind(tenant.kind.to_string())
		.bind(&tenant.name)
		.bind(tenant.owner.to_string())
		.bind(tenant.pricing_plan.to_string())
		.bind(tenant.created_at.to_rfc3339())
		.bind(tenant.updated_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		for member in tenant.members.iter().filter(|m| m.user_id != tenant.owner) {
			sqlx::query(
				r#"
				INSERT INTO tenant_members (tenant_id, user_id, role, created_at)
				VALUES (?, ?, ?, ?)
				ON CONFLICT(tenant_id, user_id) DO UPDATE SET role = excluded.role
				"#,
			)
			.bind(tenant.id.to_string())
			.bind(member.user_id.to_string())
			.bind(member.role.to_string())
			.bind(member.created_at.to_rfc3339())
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;

		tracing::debug!(tenant_id = %tenant.id, owner_id = %tenant.owner, "tenant created");
		Ok(())
	}

	/// Get a tenant with its members.
	///
	/// # Returns
	/// `None` if no tenant exists with this ID.
	#[tracing::instrument(skip(self), fields(tenant_id = %id))]
	pub async fn get_tenant(&self, id: &TenantId) -> Result<Option<Tenant>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, kind, name, owner_id, pricing_plan, created_at, updated_at
			FROM tenants
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};
		let mut tenant = self.row_to_tenant(&row)?;

		let member_rows = sqlx::query(
			r#"
			SELECT user_id, role, created_at
			FROM tenant_members
			WHERE tenant_id = ?
			ORDER BY created_at ASC, rowid ASC
			"#,
		)
		.bind(id.to_string())
		.fetch_all(&self.pool)
		.await?;

		tenant.members = member_rows
			.iter()
			.map(|r| self.row_to_membership(r))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Some(tenant))
	}

	/// Persist `name` and `pricing_plan`. Ownership and members have their
	/// own operations.
	#[tracing::instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
	pub async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE tenants
			SET name = ?, pricing_plan = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&tenant.name)
		.bind(tenant.pricing_plan.to_string())
		.bind(&now)
		.bind(tenant.id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("tenant {}", tenant.id)));
		}
		tracing::debug!(tenant_id = %tenant.id, "tenant updated");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(tenant_id = %id))]
	pub async fn delete_tenant(&self, id: &TenantId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(tenant_id = %id, "tenant deleted");
		}
		Ok(deleted)
	}

	// =========================================================================
	// Tenant ID lookups
	// =========================================================================

	/// IDs of tenants owned by the user, oldest first.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_owned_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id
			FROM tenants
			WHERE owner_id = ? AND (? IS NULL OR kind = ?)
			ORDER BY created_at ASC, rowid ASC
			"#,
		)
		.bind(user_id.to_string())
		.bind(kind.map(|k| k.to_string()))
		.bind(kind.map(|k| k.to_string()))
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| parse_id(r, "id").map(TenantId::new))
			.collect()
	}

	/// IDs of tenants where the user has a members entry, in join order.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_member_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT m.tenant_id
			FROM tenant_members m
			JOIN tenants t ON t.id = m.tenant_id
			WHERE m.user_id = ? AND (? IS NULL OR t.kind = ?)
			ORDER BY m.created_at ASC, m.rowid ASC
			"#,
		)
		.bind(user_id.to_string())
		.bind(kind.map(|k| k.to_string()))
		.bind(kind.map(|k| k.to_string()))
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| parse_id(r, "tenant_id").map(TenantId::new))
			.collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn count_owned_tenants(&self, user_id: &UserId) -> Result<i64, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE owner_id = ?")
			.bind(user_id.to_string())
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	// =========================================================================
	// Membership
	// =========================================================================

	/// Insert a membership or update the role of an existing one.
	///
	/// The owner never gets a members entry; upserting the owner is a no-op.
	#[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, user_id = %user_id, role = %role))]
	pub async fn upsert_member(
		&self,
		tenant_id: &TenantId,
		user_id: &UserId,
		role: TenantRole,
	) -> Result<(), DbError> {
		let mut conn = self.pool.acquire().await?;
		upsert_member_on(&mut *conn, tenant_id, user_id, role).await?;
		tracing::debug!(tenant_id = %tenant_id, user_id = %user_id, "membership upserted");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, user_id = %user_id))]
	pub async fn remove_member(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM tenant_members WHERE tenant_id = ? AND user_id = ?")
			.bind(tenant_id.to_string())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected() > 0;
		if removed {
			tracing::debug!(tenant_id = %tenant_id, user_id = %user_id, "member removed");
		}
		Ok(removed)
	}

	/// Make `new_owner` the owner of the tenant.
	///
	/// The previous owner stays on as an editor. Any members entry held by the
	/// new owner is removed.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if the tenant does not exist.
	#[tracing::instrument(skip(self), fields(tenant_id = %tenant_id, new_owner = %new_owner))]
	pub async fn transfer_ownership(
		&self,
		tenant_id: &TenantId,
		new_owner: &UserId,
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		let previous: Option<String> = sqlx::query_scalar("SELECT owner_id FROM tenants WHERE id = ?")
			.bind(tenant_id.to_string())
			.fetch_optional(&mut *tx)
			.await?;
		let Some(previous) = previous else {
			return Err(DbError::NotFound(format!("tenant {tenant_id}")));
		};

		if previous == new_owner.to_string() {
			return Ok(());
		}

		sqlx::query("UPDATE tenants SET owner_id = ?, updated_at = ? WHERE id = ?")
			.bind(new_owner.to_string())
			.bind(Utc::now().to_rfc3339())
			.bind(tenant_id.to_string())
			.execute(&mut *tx)
			.await?;

		sqlx::query("DELETE FROM tenant_members WHERE tenant_id = ? AND user_id = ?")
			.bind(tenant_id.to_string())
			.bind(new_owner.to_string())
			.execute(&mut *tx)
			.await?;

		sqlx::query(
			r#"
			INSERT INTO tenant_members (tenant_id, user_id, role, created_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT(tenant_id, user_id) DO UPDATE SET role = excluded.role
			"#,
		)
		.bind(tenant_id.to_string())
		.bind(&previous)
		.bind(TenantRole::Editor.to_string())
		.bind(Utc::now().to_rfc3339())
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::debug!(tenant_id = %tenant_id, new_owner = %new_owner, "ownership transferred");
		Ok(())
	}

	fn row_to_tenant(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Tenant, DbError> {
		Ok(Tenant {
			id: TenantId::new(parse_id(row, "id")?),
			kind: parse_enum(row, "kind")?,
			name: row.get("name"),
			owner: UserId::new(parse_id(row, "owner_id")?),
			members: Vec::new(),
			pricing_plan: parse_enum(row, "pricing_plan")?,
			created_at: parse_timestamp(row, "created_at")?,
			updated_at: parse_timestamp(row, "updated_at")?,
		})
	}

	fn row_to_membership(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Membership, DbError> {
		Ok(Membership {
			user_id: UserId::new(parse_id(row, "user_id")?),
			role: parse_enum(row, "role")?,
			created_at: parse_timestamp(row, "created_at")?,
		})
	}
}

/// Membership upsert that skips the tenant's owner. Shared with the
/// invitation accept transaction.
pub(crate) async fn upsert_member_on(
	conn: &mut sqlx::SqliteConnection,
	tenant_id: &TenantId,
	user_id: &UserId,
	role: TenantRole,
) -> Result<u64, DbError> {
	let result = sqlx::query(
		r#"
		INSERT INTO tenant_members (tenant_id, user_id, role, created_at)
		SELECT ?, ?, ?, ?
		WHERE NOT EXISTS (SELECT 1 FROM tenants WHERE id = ? AND owner_id = ?)
		ON CONFLICT(tenant_id, user_id) DO UPDATE SET role = excluded.role
		"#,
	)
	.bind(tenant_id.to_string())
	.bind(user_id.to_string())
	.bind(role.to_string())
	.bind(Utc::now().to_rfc3339())
	.bind(tenant_id.to_string())
	.bind(user_id.to_string())
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected())
}

#[async_trait]
impl TenantStore for TenantRepository {
	async fn create_tenant(&self, tenant: &Tenant) -> Result<(), DbError> {
		self.create_tenant(tenant).await
	}

	async fn get_tenant(&self, id: &TenantId) -> Result<Option<Tenant>, DbError> {
		self.get_tenant(id).await
	}

	async fn update_tenant(&self, tenant: &Tenant) -> Result<(), DbError> {
		self.update_tenant(tenant).await
	}

	async fn delete_tenant(&self, id: &TenantId) -> Result<bool, DbError> {
		self.delete_tenant(id).await
	}

	async fn list_owned_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError> {
		self.list_owned_tenant_ids(user_id, kind).await
	}

	async fn list_member_tenant_ids(
		&self,
		user_id: &UserId,
		kind: Option<TenantKind>,
	) -> Result<Vec<TenantId>, DbError> {
		self.list_member_tenant_ids(user_id, kind).await
	}

	async fn count_owned_tenants(&self, user_id: &UserId) -> Result<i64, DbError> {
		self.count_owned_tenants(user_id).await
	}

	async fn upsert_member(
		&self,
		tenant_id: &TenantId,
		user_id: &UserId,
		role: TenantRole,
	) -> Result<(), DbError> {
		self.upsert_member(tenant_id, user_id, role).await
	}

	async fn remove_member(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<bool, DbError> {
		self.remove_member(tenant_id, user_id).await
	}

	async fn transfer_ownership(
		&self,
		tenant_id: &TenantId,
		new_owner: &UserId,
	) -> Result<(), DbError> {
		self.transfer_ownership(tenant_id, new_owner).await
	}
}
