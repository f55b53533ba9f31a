// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation HTTP handlers.
//!
//! # Security
//!
//! - Invitation tokens are stored as SHA-256 hashes
//! - The plaintext token appears only in the create response
//! - Viewing an invitation never changes its state
//!
//! # Authorization Matrix
//!
//! | Endpoint            | Required Permission              |
//! |---------------------|----------------------------------|
//! | `create_invitation` | tenant owner or admin            |
//! | `list_invitations`  | tenant owner or admin            |
//! | `accept_invitation` | authenticated, invited email     |
//! | `get_invitation`    | public (with token)              |

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use eventdesk_auth::TenantId;
use eventdesk_server_api::{
	AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
	CreateInvitationResponse, ErrorResponse, InvitationAction, InvitationDetailsQuery,
	InvitationDetailsResponse, ListInvitationsResponse, PendingInvitationResponse,
};

use crate::{
	api::AppState,
	auth_middleware::{OptionalAuth, RequireAuth},
	parse_id,
};

/// Create an invitation into a tenant.
///
/// # Errors
///
/// - `400 Bad Request`: invalid tenant ID, role or email
/// - `403 Forbidden`: caller is neither the tenant owner nor an admin
/// - `404 Not Found`: tenant does not exist
#[utoipa::path(
    post,
    path = "/api/tenants/{id}/invitations",
    params(
        ("id" = String, Path, description = "Tenant ID")
    ),
    request_body = CreateInvitationRequest,
    responses(
        (status = 201, description = "Invitation created", body = CreateInvitationResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "invitations"
)]
#[tracing::instrument(
	skip(state, payload),
	fields(
		actor_id = %current_user.user.id,
		tenant_id = %tenant_id
	)
)]
pub async fn create_invitation(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(tenant_id): Path<String>,
	Json(payload): Json<CreateInvitationRequest>,
) -> impl IntoResponse {
	let tenant_id = parse_id!(TenantId, tenant_id, "tenant");

	let created = match state
		.invitation_workflow()
		.create(
			Some(&current_user.user),
			&tenant_id,
			&payload.email,
			payload.role.as_deref(),
		)
		.await
	{
		Ok(created) => created,
		Err(e) => return e.into_response(),
	};

	let accept_url = format!(
		"{}/accept-invitation?token={}",
		state.config.http.base_url, created.token
	);

	(
		StatusCode::CREATED,
		Json(CreateInvitationResponse {
			id: created.invitation.id.to_string(),
			email: created.invitation.email,
			role: created.invitation.role.to_string(),
			expires_at: created.invitation.expires_at,
			token: created.token,
			accept_url,
		}),
	)
		.into_response()
}

/// List a tenant's pending invitations. Tokens are never returned here.
#[utoipa::path(
    get,
    path = "/api/tenants/{id}/invitations",
    params(
        ("id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Pending invitations", body = ListInvitationsResponse),
        (status = 400, description = "Invalid tenant ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "invitations"
)]
#[tracing::instrument(
	skip(state),
	fields(
		actor_id = %current_user.user.id,
		tenant_id = %tenant_id
	)
)]
pub async fn list_invitations(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(tenant_id): Path<String>,
) -> impl IntoResponse {
	let tenant_id = parse_id!(TenantId, tenant_id, "tenant");

	match state
		.invitation_workflow()
		.list_pending(Some(&current_user.user), &tenant_id)
		.await
	{
		Ok(pending) => Json(ListInvitationsResponse {
			invitations: pending
				.into_iter()
				.map(|invitation| PendingInvitationResponse {
					id: invitation.id.to_string(),
					email: invitation.email,
					role: invitation.role.to_string(),
					invited_by: invitation.invited_by.to_string(),
					created_at: invitation.created_at,
					expires_at: invitation.expires_at,
				})
				.collect(),
		})
		.into_response(),
		Err(e) => e.into_response(),
	}
}

/// Accept or decline an invitation.
///
/// # Errors
///
/// - `400 Bad Request`: invitation already resolved, expired, or sent to
///   another email
/// - `401 Unauthorized`: caller is not signed in
/// - `404 Not Found`: unknown token
#[utoipa::path(
    post,
    path = "/api/accept-invitation",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Invitation resolved", body = AcceptInvitationResponse),
        (status = 400, description = "Invitation cannot be resolved", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Invitation not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "invitations"
)]
#[tracing::instrument(
	skip(state, payload),
	fields(
		actor_id = %current_user.user.id,
		action = ?payload.action
	)
)]
pub async fn accept_invitation(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<AcceptInvitationRequest>,
) -> impl IntoResponse {
	let workflow = state.invitation_workflow();
	let caller = Some(&current_user.user);

	let response = match payload.action {
		InvitationAction::Accept => workflow
			.accept(&payload.token, caller)
			.await
			.map(|outcome| AcceptInvitationResponse {
				success: true,
				action: InvitationAction::Accept,
				tenant_id: outcome.tenant_id.to_string(),
				tenant_kind: outcome.tenant_kind.to_string(),
				role: Some(outcome.role.to_string()),
			}),
		InvitationAction::Decline => workflow
			.decline(&payload.token, caller)
			.await
			.map(|outcome| AcceptInvitationResponse {
				success: true,
				action: InvitationAction::Decline,
				tenant_id: outcome.tenant_id.to_string(),
				tenant_kind: outcome.tenant_kind.to_string(),
				role: None,
			}),
	};

	match response {
		Ok(body) => (StatusCode::OK, Json(body)).into_response(),
		Err(e) => e.into_response(),
	}
}

/// Show an invitation before responding to it.
///
/// Works without a session; with one, reports whether the signed-in email
/// matches the invitation.
#[utoipa::path(
    get,
    path = "/api/accept-invitation",
    params(InvitationDetailsQuery),
    responses(
        (status = 200, description = "Invitation details", body = InvitationDetailsResponse),
        (status = 404, description = "Invitation not found", body = ErrorResponse)
    ),
    tag = "invitations"
)]
#[tracing::instrument(skip(state, query, current_user))]
pub async fn get_invitation(
	OptionalAuth(current_user): OptionalAuth,
	State(state): State<AppState>,
	Query(query): Query<InvitationDetailsQuery>,
) -> impl IntoResponse {
	let caller = current_user.as_ref().map(|c| &c.user);

	match state.invitation_workflow().describe(&query.token, caller).await {
		Ok(details) => (
			StatusCode::OK,
			Json(InvitationDetailsResponse {
				email: details.invitation.email,
				tenant_id: details.tenant.id.to_string(),
				tenant_name: details.tenant.name,
				tenant_kind: details.tenant.kind.to_string(),
				role: details.invitation.role.to_string(),
				status: details.status.to_string(),
				expires_at: details.invitation.expires_at,
				is_authenticated: details.is_authenticated,
				current_user_email: details.current_user_email,
				email_mismatch: details.email_mismatch,
			}),
		)
			.into_response(),
		Err(e) => e.into_response(),
	}
}
