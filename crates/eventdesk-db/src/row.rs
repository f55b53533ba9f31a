// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_id(row: &SqliteRow, column: &str) -> Result<Uuid, DbError> {
	let value: String = row.get(column);
	Uuid::parse_str(&value).map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, DbError> {
	let value: String = row.get(column);
	DateTime::parse_from_rfc3339(&value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_optional_timestamp(
	row: &SqliteRow,
	column: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
	let value: Option<String> = row.get(column);
	value
		.map(|v| {
			DateTime::parse_from_rfc3339(&v)
				.map(|dt| dt.with_timezone(&Utc))
				.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
		})
		.transpose()
}

/// Parses a stored enum column through its `FromStr` impl.
pub(crate) fn parse_enum<T>(row: &SqliteRow, column: &str) -> Result<T, DbError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	let value: String = row.get(column);
	value
		.parse()
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}
