// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event HTTP handlers.
//!
//! Events belong to exactly one tenant. Reads are scoped to the caller's
//! tenants; creating requires the editor role or above in the target tenant.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use eventdesk_auth::access::tenant_content_write_access;
use eventdesk_auth::{Event, EventId, TenantId};
use eventdesk_server_api::{CreateEventRequest, ErrorResponse, EventResponse, ListEventsResponse};

use crate::{
	api::AppState,
	api_response::{bad_request, forbidden, internal_error, not_found},
	auth_middleware::RequireAuth,
	parse_id, tenancy,
};

fn event_response(event: Event) -> EventResponse {
	EventResponse {
		id: event.id.to_string(),
		tenant_id: event.tenant_id.to_string(),
		name: event.name,
		status: event.status.to_string(),
		starts_at: event.starts_at,
		created_at: event.created_at,
	}
}

/// List the events the caller can see.
///
/// Admins see every event. Callers without tenants get an empty list.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Visible events", body = ListEventsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "events"
)]
#[tracing::instrument(skip(state), fields(actor_id = %current_user.user.id))]
pub async fn list_events(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	let decision =
		tenancy::tenant_scoped_access_for(state.tenant_repo.as_ref(), Some(&current_user.user)).await;

	let result = if decision.is_allowed() {
		state.event_repo.list_events(decision.filter()).await
	} else {
		Ok(Vec::new())
	};

	match result {
		Ok(events) => Json(ListEventsResponse {
			events: events.into_iter().map(event_response).collect(),
		})
		.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list events");
			internal_error().into_response()
		}
	}
}

/// Fetch one event. Events outside the caller's tenants are reported as
/// missing.
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 400, description = "Invalid event ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "events"
)]
#[tracing::instrument(skip(state), fields(actor_id = %current_user.user.id, event_id = %event_id))]
pub async fn get_event(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(event_id): Path<String>,
) -> impl IntoResponse {
	let event_id = parse_id!(EventId, event_id, "event");

	let event = match state.event_repo.get_event(&event_id).await {
		Ok(Some(event)) => event,
		Ok(None) => return not_found("Event not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load event");
			return internal_error().into_response();
		}
	};

	let decision =
		tenancy::tenant_scoped_access_for(state.tenant_repo.as_ref(), Some(&current_user.user)).await;
	if !decision.permits(&event.access_row()) {
		tracing::debug!(tenant_id = %event.tenant_id, "event outside caller's tenants");
		return not_found("Event not found").into_response();
	}

	Json(event_response(event)).into_response()
}

/// Create an event.
///
/// Without `tenant_id` the caller's only tenant is used; callers with several
/// tenants, or none, must name one.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid request or no default tenant", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an editor of the tenant", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "events"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %current_user.user.id))]
pub async fn create_event(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateEventRequest>,
) -> impl IntoResponse {
	let caller = &current_user.user;

	let name = payload.name.trim();
	if name.is_empty() {
		return bad_request("invalid_name", "Event name is required").into_response();
	}

	let tenant_id = match payload.tenant_id.as_deref() {
		Some(raw) => match TenantId::parse(raw) {
			Ok(id) => id,
			Err(_) => return bad_request("invalid_id", "Invalid tenant ID").into_response(),
		},
		None => match tenancy::default_tenant_id(state.tenant_repo.as_ref(), Some(caller), None).await
		{
			Some(id) => id,
			None => {
				return bad_request(
					"tenant_required",
					"tenant_id is required unless you belong to exactly one tenant",
				)
				.into_response();
			}
		},
	};

	let tenant = match state.tenant_repo.get_tenant(&tenant_id).await {
		Ok(Some(tenant)) => tenant,
		Ok(None) => return not_found("Tenant not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, tenant_id = %tenant_id, "failed to load tenant");
			return internal_error().into_response();
		}
	};

	if !tenant_content_write_access(Some(caller), tenant.role_of(&caller.id)) {
		return forbidden("forbidden", "Editor role required to create events").into_response();
	}

	let mut event = Event::new(tenant.id, name);
	event.starts_at = payload.starts_at;

	if let Err(e) = state.event_repo.create_event(&event).await {
		tracing::error!(error = %e, "failed to create event");
		return internal_error().into_response();
	}

	tracing::info!(event_id = %event.id, tenant_id = %tenant.id, "event created");
	(StatusCode::CREATED, Json(event_response(event))).into_response()
}
