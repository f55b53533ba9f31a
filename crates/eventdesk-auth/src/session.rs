// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login sessions issued by the authentication subsystem.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SessionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	#[serde(skip_serializing)]
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Default session lifetime in days.
	pub const DEFAULT_TTL_DAYS: i64 = 30;

	pub fn new(user_id: UserId, token_hash: impl Into<String>, ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::generate(),
			user_id,
			token_hash: token_hash.into(),
			created_at: now,
			expires_at: now + ttl,
		}
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now > self.expires_at
	}
}
