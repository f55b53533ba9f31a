// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TenancyQuery {
	/// Untrusted event id, e.g. from a page query string.
	#[serde(default)]
	pub event: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenancyResponse {
	pub organization_ids: Vec<String>,
	pub team_ids: Vec<String>,
	pub default_organization_id: Option<String>,
	pub default_team_id: Option<String>,
	/// The requested event id if the caller may access it.
	pub event: Option<String>,
}
