// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session authentication configuration.

use serde::Deserialize;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "eventdesk_session";

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub session_cookie_name: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_cookie_name: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
		}
	}
}
