// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
	pub name: String,
	/// Omit to use the caller's only tenant.
	#[serde(default)]
	pub tenant_id: Option<String>,
	#[serde(default)]
	pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
	pub id: String,
	pub tenant_id: String,
	pub name: String,
	pub status: String,
	pub starts_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListEventsResponse {
	pub events: Vec<EventResponse>,
}
