// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation workflow configuration.

use serde::Deserialize;

pub const DEFAULT_EXPIRY_DAYS: i64 = 7;
pub const MAX_EXPIRY_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct InvitationsConfig {
	/// Days until a new invitation expires, from 1 to [`MAX_EXPIRY_DAYS`].
	pub expiry_days: i64,
	/// Compare invitation and account emails byte-for-byte instead of
	/// case-insensitively.
	pub case_sensitive_email: bool,
}

impl Default for InvitationsConfig {
	fn default() -> Self {
		InvitationsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvitationsConfigLayer {
	#[serde(default)]
	pub expiry_days: Option<i64>,
	#[serde(default)]
	pub case_sensitive_email: Option<bool>,
}

impl InvitationsConfigLayer {
	pub fn merge(&mut self, other: InvitationsConfigLayer) {
		if other.expiry_days.is_some() {
			self.expiry_days = other.expiry_days;
		}
		if other.case_sensitive_email.is_some() {
			self.case_sensitive_email = other.case_sensitive_email;
		}
	}

	pub fn finalize(self) -> InvitationsConfig {
		InvitationsConfig {
			expiry_days: self.expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS),
			case_sensitive_email: self.case_sensitive_email.unwrap_or(false),
		}
	}
}
