// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the eventdesk server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`EVENTDESK_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use eventdesk_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENV_PREFIX};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub invitations: InvitationsConfig,
	pub auth: AuthConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`EVENTDESK_SERVER_*`)
/// 2. Config file (`/etc/eventdesk/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	];
	load_from_sources(sources)
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		database: layer.database.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		invitations: layer.invitations.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		database_pool_size = config.database.pool_size(),
		invitation_expiry_days = config.invitations.expiry_days,
		log_format = %config.logging.format,
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.http.port == 0 {
		return Err(ConfigError::Validation(
			"http.port must be non-zero".to_string(),
		));
	}
	config.database.validate()?;
	if !(1..=MAX_EXPIRY_DAYS).contains(&config.invitations.expiry_days) {
		return Err(ConfigError::Validation(format!(
			"invitations.expiry_days must be between 1 and {MAX_EXPIRY_DAYS}, got {}",
			config.invitations.expiry_days
		)));
	}
	if config.auth.session_cookie_name.trim().is_empty() {
		return Err(ConfigError::Validation(
			"auth.session_cookie_name must not be empty".to_string(),
		));
	}
	Ok(())
}
