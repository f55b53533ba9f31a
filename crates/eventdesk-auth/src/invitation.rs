// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitations to join a tenant.
//!
//! An invitation starts `pending` and moves to exactly one of `accepted`,
//! `declined` or `expired`. All three are terminal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{InvitationId, TenantId, TenantRole, UnknownVariant, UserId};

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
	Pending,
	Accepted,
	Declined,
	Expired,
}

impl InvitationStatus {
	/// Returns true for every state except `pending`.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, InvitationStatus::Pending)
	}
}

impl fmt::Display for InvitationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			InvitationStatus::Pending => write!(f, "pending"),
			InvitationStatus::Accepted => write!(f, "accepted"),
			InvitationStatus::Declined => write!(f, "declined"),
			InvitationStatus::Expired => write!(f, "expired"),
		}
	}
}

impl FromStr for InvitationStatus {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(InvitationStatus::Pending),
			"accepted" => Ok(InvitationStatus::Accepted),
			"declined" => Ok(InvitationStatus::Declined),
			"expired" => Ok(InvitationStatus::Expired),
			other => Err(UnknownVariant {
				kind: "invitation status",
				value: other.to_string(),
			}),
		}
	}
}

/// A pending or resolved invitation.
///
/// Only the SHA-256 hash of the token is kept; see [`crate::hash_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
	pub id: InvitationId,
	pub tenant_id: TenantId,
	pub email: String,
	pub role: TenantRole,
	pub status: InvitationStatus,
	pub invited_by: UserId,
	#[serde(skip_serializing)]
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
	pub resolved_at: Option<DateTime<Utc>>,
}

impl Invitation {
	/// Default number of days before an invitation expires.
	pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

	/// Longest expiry honoured by [`Invitation::new`], about ten years.
	pub const MAX_EXPIRY_DAYS: i64 = 3650;

	/// Creates a pending invitation expiring `expiry_days` from now.
	///
	/// `expiry_days` is clamped to [`Invitation::MAX_EXPIRY_DAYS`] in either
	/// direction.
	pub fn new(
		tenant_id: TenantId,
		email: impl Into<String>,
		role: TenantRole,
		invited_by: UserId,
		token_hash: impl Into<String>,
		expiry_days: i64,
	) -> Self {
		let now = Utc::now();
		Self {
			id: InvitationId::generate(),
			tenant_id,
			email: email.into(),
			role,
			status: InvitationStatus::Pending,
			invited_by,
			token_hash: token_hash.into(),
			created_at: now,
			expires_at: now
				+ Duration::days(expiry_days.clamp(-Self::MAX_EXPIRY_DAYS, Self::MAX_EXPIRY_DAYS)),
			resolved_at: None,
		}
	}

	/// Returns true if `now` is strictly after `expires_at`.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now > self.expires_at
	}

	/// Status as it should be displayed at `now`.
	///
	/// A pending invitation past its expiry is shown as expired without the
	/// change being persisted.
	pub fn effective_status_at(&self, now: DateTime<Utc>) -> InvitationStatus {
		if self.status == InvitationStatus::Pending && self.is_expired_at(now) {
			InvitationStatus::Expired
		} else {
			self.status
		}
	}
}
