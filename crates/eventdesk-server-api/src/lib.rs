// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod error;
pub mod events;
pub mod health;
pub mod invitations;
pub mod me;
pub mod tenants;
pub mod users;

pub use error::ErrorResponse;
pub use events::{CreateEventRequest, EventResponse, ListEventsResponse};
pub use health::HealthResponse;
pub use invitations::{
	AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
	CreateInvitationResponse, InvitationAction, InvitationDetailsQuery,
	InvitationDetailsResponse, ListInvitationsResponse, PendingInvitationResponse,
};
pub use me::{TenancyQuery, TenancyResponse};
pub use tenants::{
	CreateTenantRequest, DeleteTenantResponse, RemoveMemberResponse, TenantMemberResponse,
	TenantResponse, UpdateTenantRequest,
};
pub use users::DeleteUserResponse;
