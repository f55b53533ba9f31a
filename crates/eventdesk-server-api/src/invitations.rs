// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
	#[default]
	Accept,
	Decline,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptInvitationRequest {
	pub token: String,
	/// Defaults to `accept`.
	#[serde(default)]
	pub action: InvitationAction,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AcceptInvitationResponse {
	pub success: bool,
	pub action: InvitationAction,
	pub tenant_id: String,
	pub tenant_kind: String,
	/// Present when the invitation was accepted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InvitationDetailsQuery {
	pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvitationDetailsResponse {
	pub email: String,
	pub tenant_id: String,
	pub tenant_name: String,
	pub tenant_kind: String,
	pub role: String,
	/// Shown as `expired` once a pending invitation passes its expiry.
	pub status: String,
	pub expires_at: DateTime<Utc>,
	pub is_authenticated: bool,
	pub current_user_email: Option<String>,
	pub email_mismatch: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
	pub email: String,
	/// `editor` or `viewer`. Defaults to `viewer`.
	#[serde(default)]
	pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateInvitationResponse {
	pub id: String,
	pub email: String,
	pub role: String,
	pub expires_at: DateTime<Utc>,
	/// Plaintext token. Returned only once.
	pub token: String,
	pub accept_url: String,
}

/// A pending invitation as listed to the tenant owner. Never carries the token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingInvitationResponse {
	pub id: String,
	pub email: String,
	pub role: String,
	pub invited_by: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListInvitationsResponse {
	pub invitations: Vec<PendingInvitationResponse>,
}
