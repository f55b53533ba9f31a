// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller tenancy, used by the front end to scope forms and page guards.

use axum::{
	extract::{Query, State},
	response::IntoResponse,
	Json,
};
use eventdesk_auth::TenantId;
use eventdesk_server_api::{ErrorResponse, TenancyQuery, TenancyResponse};

use crate::{
	api::AppState, api_response::internal_error, auth_middleware::RequireAuth,
	event_access::sanitize_event_param, tenancy,
};

fn ids_to_strings(ids: &[TenantId]) -> Vec<String> {
	ids.iter().map(ToString::to_string).collect()
}

/// The caller's tenants, default tenant per kind, and the requested event if
/// the caller may access it.
#[utoipa::path(
    get,
    path = "/api/me/tenancy",
    params(TenancyQuery),
    responses(
        (status = 200, description = "Caller tenancy", body = TenancyResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "me"
)]
#[tracing::instrument(skip(state, query), fields(actor_id = %current_user.user.id))]
pub async fn get_tenancy(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(query): Query<TenancyQuery>,
) -> impl IntoResponse {
	let tenants = state.tenant_repo.as_ref();
	let caller = Some(&current_user.user);

	let (organization_ids, team_ids) = match futures::try_join!(
		tenancy::get_user_organization_ids(tenants, caller),
		tenancy::get_user_team_ids(tenants, caller),
	) {
		Ok(ids) => ids,
		Err(e) => {
			tracing::error!(error = %e, "failed to resolve tenancy");
			return internal_error().into_response();
		}
	};

	let event = sanitize_event_param(
		tenants,
		state.event_repo.as_ref(),
		caller,
		query.event.as_deref(),
	)
	.await;

	Json(TenancyResponse {
		organization_ids: ids_to_strings(&organization_ids),
		team_ids: ids_to_strings(&team_ids),
		default_organization_id: tenancy::sole_tenant_id(&organization_ids).map(|id| id.to_string()),
		default_team_id: tenancy::sole_tenant_id(&team_ids).map(|id| id.to_string()),
		event: event.map(|id| id.to_string()),
	})
	.into_response()
}
