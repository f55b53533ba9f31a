// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and routing.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::{delete, get, patch, post},
	Json, Router,
};
use eventdesk_db::{
	create_pool, run_migrations, EventRepository, InvitationRepository, SessionRepository,
	SqlitePool, TenantRepository, UserRepository,
};
use eventdesk_server_config::ServerConfig;
use utoipa::OpenApi;

use crate::{
	api_docs::ApiDoc, auth_middleware::auth_layer, error::ServerError,
	invitation_flow::InvitationWorkflow, routes,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub user_repo: Arc<UserRepository>,
	pub session_repo: Arc<SessionRepository>,
	pub tenant_repo: Arc<TenantRepository>,
	pub event_repo: Arc<EventRepository>,
	pub invitation_repo: Arc<InvitationRepository>,
	pub config: Arc<ServerConfig>,
}

impl AppState {
	/// Invitation workflow bound to this state's stores and settings.
	pub fn invitation_workflow(&self) -> InvitationWorkflow<'_> {
		InvitationWorkflow::new(
			self.invitation_repo.as_ref(),
			self.tenant_repo.as_ref(),
			&self.config.invitations,
		)
	}
}

pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	AppState {
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		session_repo: Arc::new(SessionRepository::new(pool.clone())),
		tenant_repo: Arc::new(TenantRepository::new(pool.clone())),
		event_repo: Arc::new(EventRepository::new(pool.clone())),
		invitation_repo: Arc::new(InvitationRepository::new(pool.clone())),
		config: Arc::new(config.clone()),
		pool,
	}
}

/// Open the configured database, apply the schema and build the state.
pub async fn bootstrap(config: &ServerConfig) -> Result<AppState, ServerError> {
	if config.database.is_in_memory() {
		tracing::warn!("database is in memory; all tenants are lost on shutdown");
	}
	let pool = create_pool(&config.database.url, config.database.pool_size()).await?;
	run_migrations(&pool).await?;
	Ok(create_app_state(pool, config))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(openapi_json))
		.route(
			"/api/accept-invitation",
			get(routes::invitations::get_invitation).post(routes::invitations::accept_invitation),
		)
		.route("/api/tenants", post(routes::tenants::create_tenant))
		.route(
			"/api/tenants/{id}",
			patch(routes::tenants::update_tenant).delete(routes::tenants::delete_tenant),
		)
		.route(
			"/api/tenants/{id}/members/{user_id}",
			delete(routes::tenants::remove_member),
		)
		.route(
			"/api/tenants/{id}/invitations",
			get(routes::invitations::list_invitations).post(routes::invitations::create_invitation),
		)
		.route(
			"/api/events",
			get(routes::events::list_events).post(routes::events::create_event),
		)
		.route("/api/events/{id}", get(routes::events::get_event))
		.route("/api/me/tenancy", get(routes::me::get_tenancy))
		.route("/api/users/{id}", delete(routes::users::delete_user))
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn serve(app: Router, addr: &str) -> Result<(), ServerError> {
	let listener = tokio::net::TcpListener::bind(addr).await?;
	tracing::info!(addr = %addr, "listening");

	tokio::select! {
		result = axum::serve(listener, app) => {
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	Ok(())
}
