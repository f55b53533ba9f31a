// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User identity as seen by the authorization layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GlobalRole, UserId};

/// An authenticated principal.
///
/// Users are created by the authentication subsystem; this layer only reads
/// their global roles and email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub display_name: String,
	/// Global roles. Missing in stored JSON means no roles.
	#[serde(default)]
	pub roles: Vec<GlobalRole>,
	pub created_at: DateTime<Utc>,
}

impl User {
	/// Creates a user with no global roles.
	pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			id: UserId::generate(),
			email: email.into(),
			display_name: display_name.into(),
			roles: Vec::new(),
			created_at: Utc::now(),
		}
	}

	/// Builder: grant a global role.
	pub fn with_role(mut self, role: GlobalRole) -> Self {
		if !self.roles.contains(&role) {
			self.roles.push(role);
		}
		self
	}

	/// Returns true if the user holds the given global role.
	pub fn has_global_role(&self, role: GlobalRole) -> bool {
		self.roles.contains(&role)
	}

	/// Email in the form used for invitation matching.
	pub fn normalized_email(&self) -> String {
		normalize_email(&self.email)
	}
}

/// Lowercases and trims an email address.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}
