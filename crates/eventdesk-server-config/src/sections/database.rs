// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.
//!
//! The store is SQLite only. Tenants, memberships, invitations and sessions
//! all live in the one database named by `url`.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_URL: &str = "sqlite:./eventdesk.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
	pub max_connections: u32,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfigLayer::default().finalize()
	}
}

impl DatabaseConfig {
	/// Whether `url` names a database that only lives as long as its
	/// connection.
	pub fn is_in_memory(&self) -> bool {
		self.url.contains(":memory:") || self.url.contains("mode=memory")
	}

	/// Connections to open. An in-memory database is private to one
	/// connection, so it always gets exactly one.
	pub fn pool_size(&self) -> u32 {
		if self.is_in_memory() {
			1
		} else {
			self.max_connections
		}
	}

	pub(crate) fn validate(&self) -> Result<(), ConfigError> {
		if !self.url.starts_with("sqlite:") {
			return Err(ConfigError::Validation(format!(
				"database.url must be a sqlite: URL, got '{}'",
				self.url
			)));
		}
		if self.max_connections == 0 {
			return Err(ConfigError::Validation(
				"database.max_connections must be at least 1".to_string(),
			));
		}
		Ok(())
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
			max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
		}
	}
}
