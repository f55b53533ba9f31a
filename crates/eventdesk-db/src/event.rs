// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event repository.
//!
//! Reads go through an access [`Filter`] so visibility is enforced in the
//! query rather than after loading rows.

use async_trait::async_trait;
use chrono::Utc;
use eventdesk_auth::{Event, EventId, Filter, TenantId};
use sqlx::{
	sqlite::{Sqlite, SqlitePool},
	QueryBuilder, Row,
};

use crate::error::DbError;
use crate::row::{parse_enum, parse_id, parse_optional_timestamp, parse_timestamp};

#[async_trait]
pub trait EventStore: Send + Sync {
	async fn create_event(&self, event: &Event) -> Result<(), DbError>;
	async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DbError>;
	/// Lists events matching `filter`, or all events when `None`.
	async fn list_events(&self, filter: Option<&Filter>) -> Result<Vec<Event>, DbError>;
	async fn count_events(&self, filter: &Filter) -> Result<i64, DbError>;
}

#[derive(Clone)]
pub struct EventRepository {
	pool: SqlitePool,
}

impl EventRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, event), fields(event_id = %event.id, tenant_id = %event.tenant_id))]
	pub async fn create_event(&self, event: &Event) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			INSERT INTO events (id, tenant_id, name, status, starts_at, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(event.id.to_string())
		.bind(event.tenant_id.to_string())
		.bind(&event.name)
		.bind(event.status.to_string())
		.bind(event.starts_at.map(|d| d.to_rfc3339()))
		.bind(event.created_at.to_rfc3339())
		.bind(now)
		.execute(&self.pool)
		.await?;

		tracing::debug!(event_id = %event.id, "event created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(event_id = %id))]
	pub async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, tenant_id, name, status, starts_at, created_at, updated_at
			FROM events
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_event(&r)).transpose()
	}

	#[tracing::instrument(skip(self, filter))]
	pub async fn list_events(&self, filter: Option<&Filter>) -> Result<Vec<Event>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(
			"SELECT id, tenant_id, name, status, starts_at, created_at, updated_at FROM events",
		);
		if let Some(filter) = filter {
			qb.push(" WHERE ");
			push_filter(&mut qb, filter);
		}
		qb.push(" ORDER BY created_at ASC, rowid ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(|r| self.row_to_event(r)).collect()
	}

	#[tracing::instrument(skip(self, filter))]
	pub async fn count_events(&self, filter: &Filter) -> Result<i64, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM events WHERE ");
		push_filter(&mut qb, filter);

		let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
		Ok(count)
	}

	fn row_to_event(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Event, DbError> {
		Ok(Event {
			id: EventId::new(parse_id(row, "id")?),
			tenant_id: TenantId::new(parse_id(row, "tenant_id")?),
			name: row.get("name"),
			status: parse_enum(row, "status")?,
			starts_at: parse_optional_timestamp(row, "starts_at")?,
			created_at: parse_timestamp(row, "created_at")?,
			updated_at: parse_timestamp(row, "updated_at")?,
		})
	}
}

/// Appends `filter` as a SQL boolean expression over `id` and `tenant_id`.
///
/// An empty `TenantIn` renders as `0` (matches nothing); an empty `And` as
/// `1` (matches everything).
pub(crate) fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
	match filter {
		Filter::IdEquals(id) => {
			qb.push("id = ").push_bind(id.to_string());
		}
		Filter::TenantIn(ids) if ids.is_empty() => {
			qb.push("0");
		}
		Filter::TenantIn(ids) => {
			qb.push("tenant_id IN (");
			let mut separated = qb.separated(", ");
			for id in ids {
				separated.push_bind(id.to_string());
			}
			separated.push_unseparated(")");
		}
		Filter::And(filters) if filters.is_empty() => {
			qb.push("1");
		}
		Filter::And(filters) => {
			qb.push("(");
			for (i, f) in filters.iter().enumerate() {
				if i > 0 {
					qb.push(" AND ");
				}
				push_filter(qb, f);
			}
			qb.push(")");
		}
	}
}

#[async_trait]
impl EventStore for EventRepository {
	async fn create_event(&self, event: &Event) -> Result<(), DbError> {
		self.create_event(event).await
	}

	async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DbError> {
		self.get_event(id).await
	}

	async fn list_events(&self, filter: Option<&Filter>) -> Result<Vec<Event>, DbError> {
		self.list_events(filter).await
	}

	async fn count_events(&self, filter: &Filter) -> Result<i64, DbError> {
		self.count_events(filter).await
	}
}
