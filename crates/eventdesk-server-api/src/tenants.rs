// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTenantRequest {
	/// `organization` or `team`.
	pub kind: String,
	pub name: String,
}

/// Partial update. Each present field is checked against its own gate.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTenantRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub pricing_plan: Option<String>,
	/// New owner's user id.
	#[serde(default)]
	pub owner: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantMemberResponse {
	pub user_id: String,
	pub role: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
	pub id: String,
	pub kind: String,
	pub name: String,
	pub owner: String,
	pub pricing_plan: String,
	pub members: Vec<TenantMemberResponse>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteTenantResponse {
	pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveMemberResponse {
	pub removed: bool,
}
