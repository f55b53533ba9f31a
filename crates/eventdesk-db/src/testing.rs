// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests in this crate and downstream crates.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use eventdesk_auth::{GlobalRole, Tenant, TenantKind, User};

use crate::error::DbError;
use crate::migrations::run_migrations;
use crate::tenant::TenantRepository;
use crate::user::UserRepository;

/// In-memory pool with the full schema.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(":memory:")
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await?;

	run_migrations(&pool).await?;
	Ok(pool)
}

/// Inserts a user with the given email and optional global role.
pub async fn insert_user(
	pool: &SqlitePool,
	email: &str,
	role: Option<GlobalRole>,
) -> Result<User, DbError> {
	let mut user = User::new(email, email.split('@').next().unwrap_or(email));
	if let Some(role) = role {
		user = user.with_role(role);
	}
	UserRepository::new(pool.clone()).create_user(&user).await?;
	Ok(user)
}

/// Inserts a tenant of the given kind owned by `owner`.
pub async fn insert_tenant(
	pool: &SqlitePool,
	kind: TenantKind,
	name: &str,
	owner: &User,
) -> Result<Tenant, DbError> {
	let tenant = Tenant::new(kind, name, owner.id);
	TenantRepository::new(pool.clone()).create_tenant(&tenant).await?;
	Ok(tenant)
}
