// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment
//! variables.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, InvitationsConfigLayer, LogFormat,
	LoggingConfigLayer,
};

/// Prefix shared by every environment variable the server reads.
pub const ENV_PREFIX: &str = "EVENTDESK_SERVER_";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/eventdesk/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `EVENTDESK_SERVER_<FIELD>` for listener settings and
/// `EVENTDESK_SERVER_<SECTION>_<FIELD>` for everything else.
pub struct EnvSource {
	overrides: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self { overrides: None }
	}

	/// Reads from a fixed map instead of the process environment.
	pub fn from_map(vars: HashMap<String, String>) -> Self {
		Self {
			overrides: Some(vars),
		}
	}

	fn var(&self, field: &str) -> Option<String> {
		let name = format!("{ENV_PREFIX}{field}");
		let value = match &self.overrides {
			Some(map) => map.get(&name).cloned(),
			None => std::env::var(&name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn bool(&self, field: &str) -> Option<bool> {
		self
			.var(field)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parsed<T>(&self, field: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
	{
		match self.var(field) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: format!("{ENV_PREFIX}{field}"),
				message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
			}),
			None => Ok(None),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: self.var("HOST"),
				port: self.parsed("PORT")?,
				base_url: self.var("BASE_URL"),
			}),
			database: Some(DatabaseConfigLayer {
				url: self.var("DATABASE_URL"),
				max_connections: self.parsed("DATABASE_MAX_CONNECTIONS")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: self.var("LOG_LEVEL"),
				format: self.parsed::<LogFormat>("LOG_FORMAT")?,
			}),
			invitations: Some(InvitationsConfigLayer {
				expiry_days: self.parsed("INVITATIONS_EXPIRY_DAYS")?,
				case_sensitive_email: self.bool("INVITATIONS_CASE_SENSITIVE_EMAIL"),
			}),
			auth: Some(AuthConfigLayer {
				session_cookie_name: self.var("AUTH_SESSION_COOKIE_NAME"),
			}),
		})
	}
}
