// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and foreign keys enforced.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./eventdesk.db")
/// * `max_connections` - upper bound on open connections
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!(max_connections, "database pool created");
	Ok(pool)
}

/// Round-trips a trivial query. Used by the health endpoint.
pub async fn ping(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query("SELECT 1").execute(pool).await?;
	Ok(())
}
