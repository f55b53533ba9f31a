// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema creation.
//!
//! Every statement is idempotent so `run_migrations` can be called on each
//! startup.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		email TEXT NOT NULL UNIQUE,
		display_name TEXT NOT NULL,
		roles TEXT NOT NULL DEFAULT '[]',
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS tenants (
		id TEXT PRIMARY KEY,
		kind TEXT NOT NULL,
		name TEXT NOT NULL,
		owner_id TEXT NOT NULL REFERENCES users(id),
		pricing_plan TEXT NOT NULL DEFAULT 'free',
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_tenants_owner ON tenants(owner_id)",
	r#"
	CREATE TABLE IF NOT EXISTS tenant_members (
		tenant_id TEXT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		role TEXT NOT NULL,
		created_at TEXT NOT NULL,
		PRIMARY KEY (tenant_id, user_id)
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_tenant_members_user ON tenant_members(user_id)",
	r#"
	CREATE TABLE IF NOT EXISTS events (
		id TEXT PRIMARY KEY,
		tenant_id TEXT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
		name TEXT NOT NULL,
		status TEXT NOT NULL DEFAULT 'planning',
		starts_at TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_events_tenant ON events(tenant_id)",
	r#"
	CREATE TABLE IF NOT EXISTS invitations (
		id TEXT PRIMARY KEY,
		tenant_id TEXT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
		email TEXT NOT NULL,
		role TEXT NOT NULL,
		status TEXT NOT NULL DEFAULT 'pending',
		invited_by TEXT NOT NULL,
		token_hash TEXT NOT NULL UNIQUE,
		created_at TEXT NOT NULL,
		expires_at TEXT NOT NULL,
		resolved_at TEXT
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_invitations_tenant ON invitations(tenant_id, status)",
	r#"
	CREATE TABLE IF NOT EXISTS sessions (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		token_hash TEXT NOT NULL UNIQUE,
		created_at TEXT NOT NULL,
		expires_at TEXT NOT NULL
	)
	"#,
];

/// Creates all tables and indexes if they do not exist.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!(statements = SCHEMA.len(), "schema ready");
	Ok(())
}
