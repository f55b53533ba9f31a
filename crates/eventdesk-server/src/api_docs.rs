// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for eventdesk-server, served at `/api/openapi.json`.

use eventdesk_server_api::{
	AcceptInvitationRequest, AcceptInvitationResponse, CreateEventRequest, CreateInvitationRequest,
	CreateInvitationResponse, CreateTenantRequest, DeleteTenantResponse, DeleteUserResponse,
	ErrorResponse, EventResponse, HealthResponse, InvitationAction, InvitationDetailsResponse,
	ListEventsResponse, ListInvitationsResponse, PendingInvitationResponse, RemoveMemberResponse,
	TenancyResponse, TenantMemberResponse, TenantResponse, UpdateTenantRequest,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eventdesk Server API",
        version = "1.0.0",
        description = "Tenancy, membership and invitation endpoints for eventdesk.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::invitations::accept_invitation,
        crate::routes::invitations::get_invitation,
        crate::routes::invitations::create_invitation,
        crate::routes::invitations::list_invitations,
        crate::routes::tenants::create_tenant,
        crate::routes::tenants::update_tenant,
        crate::routes::tenants::delete_tenant,
        crate::routes::tenants::remove_member,
        crate::routes::events::list_events,
        crate::routes::events::create_event,
        crate::routes::events::get_event,
        crate::routes::me::get_tenancy,
        crate::routes::users::delete_user,
    ),
    components(schemas(
        AcceptInvitationRequest,
        AcceptInvitationResponse,
        CreateEventRequest,
        CreateInvitationRequest,
        CreateInvitationResponse,
        CreateTenantRequest,
        DeleteTenantResponse,
        DeleteUserResponse,
        ErrorResponse,
        EventResponse,
        HealthResponse,
        InvitationAction,
        InvitationDetailsResponse,
        ListEventsResponse,
        ListInvitationsResponse,
        PendingInvitationResponse,
        RemoveMemberResponse,
        TenancyResponse,
        TenantMemberResponse,
        TenantResponse,
        UpdateTenantRequest,
    )),
    tags(
        (name = "health", description = "Health checks"),
        (name = "invitations", description = "Invitation creation and response"),
        (name = "tenants", description = "Organizations and teams"),
        (name = "events", description = "Tenant-scoped events"),
        (name = "me", description = "Caller tenancy"),
        (name = "users", description = "User lifecycle")
    )
)]
pub struct ApiDoc;
