// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Events owned by a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::access::Row;
use crate::types::{EventId, TenantId, UnknownVariant};

/// Lifecycle of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
	#[default]
	Planning,
	Open,
	Closed,
	Archived,
}

impl fmt::Display for EventStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EventStatus::Planning => write!(f, "planning"),
			EventStatus::Open => write!(f, "open"),
			EventStatus::Closed => write!(f, "closed"),
			EventStatus::Archived => write!(f, "archived"),
		}
	}
}

impl FromStr for EventStatus {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"planning" => Ok(EventStatus::Planning),
			"open" => Ok(EventStatus::Open),
			"closed" => Ok(EventStatus::Closed),
			"archived" => Ok(EventStatus::Archived),
			other => Err(UnknownVariant {
				kind: "event status",
				value: other.to_string(),
			}),
		}
	}
}

/// An event belonging to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
	pub id: EventId,
	pub tenant_id: TenantId,
	pub name: String,
	pub status: EventStatus,
	pub starts_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Event {
	/// Creates a new event in the `planning` state.
	pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: EventId::generate(),
			tenant_id,
			name: name.into(),
			status: EventStatus::default(),
			starts_at: None,
			created_at: now,
			updated_at: now,
		}
	}

	/// The attributes access filters inspect.
	pub fn access_row(&self) -> Row {
		Row {
			id: self.id.into_inner(),
			tenant_id: Some(self.tenant_id),
		}
	}
}
