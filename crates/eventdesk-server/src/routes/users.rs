// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User lifecycle handlers.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
	Json,
};
use eventdesk_auth::UserId;
use eventdesk_server_api::{DeleteUserResponse, ErrorResponse};

use crate::{
	api::AppState, api_response::not_found, auth_middleware::RequireAuth, parse_id, tenancy,
};

/// Delete a user. Refused while the user still owns a tenant.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponse),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User owns tenants", body = ErrorResponse)
    ),
    tag = "users"
)]
#[tracing::instrument(
	skip(state),
	fields(
		actor_id = %current_user.user.id,
		user_id = %user_id
	)
)]
pub async fn delete_user(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> impl IntoResponse {
	let user_id = parse_id!(UserId, user_id, "user");

	match tenancy::delete_user(
		state.tenant_repo.as_ref(),
		state.user_repo.as_ref(),
		&current_user.user,
		&user_id,
	)
	.await
	{
		Ok(true) => Json(DeleteUserResponse { deleted: true }).into_response(),
		Ok(false) => not_found("User not found").into_response(),
		Err(e) => e.into_response(),
	}
}
