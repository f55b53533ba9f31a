// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Eventdesk tenancy server.
//!
//! This crate provides the HTTP surface for multi-tenant event management:
//! tenant membership and role resolution, access predicates, the invitation
//! workflow and event access validation, backed by SQLite.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod event_access;
pub mod invitation_flow;
pub mod routes;
pub mod tenancy;

pub use api::{bootstrap, create_app_state, create_router, serve, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use eventdesk_server_config::ServerConfig;
pub use event_access::{sanitize_event_param, validate_event_access};
pub use invitation_flow::{InvitationError, InvitationWorkflow};
pub use tenancy::TenancyError;
