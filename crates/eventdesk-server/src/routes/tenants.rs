// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant HTTP handlers.
//!
//! # Authorization Matrix
//!
//! | Field / Endpoint        | Required Permission          |
//! |-------------------------|------------------------------|
//! | `create_tenant`         | authenticated (any)          |
//! | `update_tenant` `name`  | tenant owner or admin        |
//! | `update_tenant` `owner` | tenant owner or admin        |
//! | `update_tenant` `pricing_plan` | admin                 |
//! | `update_tenant` (any)   | tenant member or admin       |
//! | `delete_tenant`         | tenant owner or admin        |
//! | `remove_member`         | tenant owner, admin or self  |
//!
//! Every gate in a PATCH is checked before anything is written.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use eventdesk_auth::access::{
	is_admin, owner_field_access, pricing_plan_field_access, tenant_create_access,
};
use eventdesk_auth::{FieldOperation, FieldTarget, PricingPlan, Tenant, TenantId, TenantKind, UserId};
use eventdesk_server_api::{
	CreateTenantRequest, DeleteTenantResponse, ErrorResponse, RemoveMemberResponse,
	TenantMemberResponse, TenantResponse, UpdateTenantRequest,
};

use crate::{
	api::AppState,
	api_response::{bad_request, forbidden, internal_error, not_found, unauthorized},
	auth_middleware::RequireAuth,
	parse_id, tenancy,
};

fn tenant_response(tenant: Tenant) -> TenantResponse {
	TenantResponse {
		id: tenant.id.to_string(),
		kind: tenant.kind.to_string(),
		name: tenant.name,
		owner: tenant.owner.to_string(),
		pricing_plan: tenant.pricing_plan.to_string(),
		members: tenant
			.members
			.into_iter()
			.map(|m| TenantMemberResponse {
				user_id: m.user_id.to_string(),
				role: m.role.to_string(),
				created_at: m.created_at,
			})
			.collect(),
		created_at: tenant.created_at,
		updated_at: tenant.updated_at,
	}
}

fn validate_name(name: &str) -> Option<String> {
	let name = name.trim();
	(!name.is_empty() && name.len() <= 200).then(|| name.to_string())
}

/// Create an organization or team owned by the caller.
#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantResponse),
        (status = 400, description = "Invalid kind or name", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "tenants"
)]
#[tracing::instrument(skip(state, payload), fields(actor_id = %current_user.user.id))]
pub async fn create_tenant(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateTenantRequest>,
) -> impl IntoResponse {
	if !tenant_create_access(Some(&current_user.user)) {
		return unauthorized().into_response();
	}

	let kind: TenantKind = match payload.kind.parse() {
		Ok(kind) => kind,
		Err(e) => return bad_request("invalid_kind", format!("{e}")).into_response(),
	};
	let Some(name) = validate_name(&payload.name) else {
		return bad_request("invalid_name", "Name must be 1-200 characters").into_response();
	};

	let tenant = Tenant::new(kind, name, current_user.user.id);
	if let Err(e) = state.tenant_repo.create_tenant(&tenant).await {
		tracing::error!(error = %e, "failed to create tenant");
		return internal_error().into_response();
	}

	tracing::info!(tenant_id = %tenant.id, kind = %tenant.kind, "tenant created");
	(StatusCode::CREATED, Json(tenant_response(tenant))).into_response()
}

/// Update a tenant's name, pricing plan or owner.
///
/// # Errors
///
/// - `400 Bad Request`: invalid ID, name or plan
/// - `403 Forbidden`: the caller is not a member, or a field gate denied the change
/// - `404 Not Found`: tenant or new owner does not exist
#[utoipa::path(
    patch,
    path = "/api/tenants/{id}",
    params(
        ("id" = String, Path, description = "Tenant ID")
    ),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated", body = TenantResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "tenants"
)]
#[tracing::instrument(
	skip(state, payload),
	fields(
		actor_id = %current_user.user.id,
		tenant_id = %tenant_id
	)
)]
pub async fn update_tenant(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(tenant_id): Path<String>,
	Json(payload): Json<UpdateTenantRequest>,
) -> impl IntoResponse {
	let tenant_id = parse_id!(TenantId, tenant_id, "tenant");
	let caller = &current_user.user;

	let mut tenant = match state.tenant_repo.get_tenant(&tenant_id).await {
		Ok(Some(tenant)) => tenant,
		Ok(None) => return not_found("Tenant not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load tenant");
			return internal_error().into_response();
		}
	};
	let caller_role = tenant.role_of(&caller.id);
	if !is_admin(Some(caller)) && caller_role.is_none() {
		return forbidden("forbidden", "Not a member of this tenant").into_response();
	}
	let owner_gate = owner_field_access(Some(caller), FieldTarget::Existing(caller_role));

	let name = match payload.name.as_deref() {
		Some(_) if !owner_gate => {
			return forbidden("forbidden", "Only the owner can rename this tenant").into_response();
		}
		Some(raw) => match validate_name(raw) {
			Some(name) => Some(name),
			None => {
				return bad_request("invalid_name", "Name must be 1-200 characters").into_response();
			}
		},
		None => None,
	};

	let pricing_plan = match payload.pricing_plan.as_deref() {
		Some(_) if !pricing_plan_field_access(Some(caller), FieldOperation::Write) => {
			return forbidden("forbidden", "Only administrators can change the pricing plan")
				.into_response();
		}
		Some(raw) => match raw.parse::<PricingPlan>() {
			Ok(plan) => Some(plan),
			Err(e) => return bad_request("invalid_pricing_plan", format!("{e}")).into_response(),
		},
		None => None,
	};

	let new_owner = match payload.owner.as_deref() {
		Some(_) if !owner_gate => {
			return forbidden("forbidden", "Only the owner can transfer this tenant").into_response();
		}
		Some(raw) => {
			let Ok(id) = UserId::parse(raw) else {
				return bad_request("invalid_id", "Invalid user ID").into_response();
			};
			match state.user_repo.get_user_by_id(&id).await {
				Ok(Some(_)) => Some(id),
				Ok(None) => return not_found("User not found").into_response(),
				Err(e) => {
					tracing::error!(error = %e, "failed to load new owner");
					return internal_error().into_response();
				}
			}
		}
		None => None,
	};

	if name.is_some() || pricing_plan.is_some() {
		if let Some(name) = name {
			tenant.name = name;
		}
		if let Some(plan) = pricing_plan {
			tenant.pricing_plan = plan;
		}
		tenant.updated_at = Utc::now();
		if let Err(e) = state.tenant_repo.update_tenant(&tenant).await {
			tracing::error!(error = %e, "failed to update tenant");
			return internal_error().into_response();
		}
	}

	if let Some(new_owner) = new_owner {
		match tenancy::transfer_ownership(
			state.tenant_repo.as_ref(),
			state.user_repo.as_ref(),
			caller,
			&tenant_id,
			&new_owner,
		)
		.await
		{
			Ok(updated) => tenant = updated,
			Err(e) => return e.into_response(),
		}
	}

	(StatusCode::OK, Json(tenant_response(tenant))).into_response()
}

/// Delete a tenant together with its members, events and invitations.
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    params(
        ("id" = String, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant deleted", body = DeleteTenantResponse),
        (status = 400, description = "Invalid tenant ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    tag = "tenants"
)]
#[tracing::instrument(
	skip(state),
	fields(
		actor_id = %current_user.user.id,
		tenant_id = %tenant_id
	)
)]
pub async fn delete_tenant(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(tenant_id): Path<String>,
) -> impl IntoResponse {
	let tenant_id = parse_id!(TenantId, tenant_id, "tenant");

	match tenancy::delete_tenant(state.tenant_repo.as_ref(), &current_user.user, &tenant_id).await {
		Ok(()) => Json(DeleteTenantResponse { deleted: true }).into_response(),
		Err(e) => e.into_response(),
	}
}

/// Remove a member from a tenant, or leave it when the caller removes themselves.
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Tenant ID"),
        ("user_id" = String, Path, description = "Member's user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = RemoveMemberResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "Tenant or member not found", body = ErrorResponse)
    ),
    tag = "tenants"
)]
#[tracing::instrument(
	skip(state),
	fields(
		actor_id = %current_user.user.id,
		tenant_id = %tenant_id,
		user_id = %user_id
	)
)]
pub async fn remove_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((tenant_id, user_id)): Path<(String, String)>,
) -> impl IntoResponse {
	let tenant_id = parse_id!(TenantId, tenant_id, "tenant");
	let user_id = parse_id!(UserId, user_id, "user");

	match tenancy::remove_member(
		state.tenant_repo.as_ref(),
		&current_user.user,
		&tenant_id,
		&user_id,
	)
	.await
	{
		Ok(()) => Json(RemoveMemberResponse { removed: true }).into_response(),
		Err(e) => e.into_response(),
	}
}
