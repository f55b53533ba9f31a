// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use eventdesk_db::ping;
use eventdesk_server_api::HealthResponse;

use crate::api::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let (status, label) = match ping(&state.pool).await {
		Ok(()) => (StatusCode::OK, "healthy"),
		Err(e) => {
			tracing::error!(error = %e, "database health check failed");
			(StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
		}
	};

	(
		status,
		Json(HealthResponse {
			status: label.to_string(),
			database: label.to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
		}),
	)
}
