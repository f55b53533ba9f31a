// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Eventdesk server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eventdesk_server::{bootstrap, create_router, serve};
use eventdesk_server_config::{load_config, load_config_with_file, LogFormat};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Eventdesk server - tenancy, invitations and event access over HTTP.
#[derive(Parser, Debug)]
#[command(name = "eventdesk-server", about = "Eventdesk tenancy server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/eventdesk/server.toml)
	#[arg(long, env = "EVENTDESK_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => load_config_with_file(path)?,
		None => load_config()?,
	};

	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	match config.logging.format {
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Pretty => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer())
			.init(),
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		invitation_expiry_days = config.invitations.expiry_days,
		"starting eventdesk-server"
	);

	let state = bootstrap(&config).await?;

	let app = create_router(state).layer(TraceLayer::new_for_http()).layer(
		CorsLayer::new()
			.allow_origin(Any)
			.allow_methods(Any)
			.allow_headers(Any),
	);

	serve(app, &config.socket_addr()).await?;

	tracing::info!("eventdesk-server stopped");
	Ok(())
}
