// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenancy and authorization types for eventdesk.
//!
//! This crate has no I/O. It defines users, tenants, events and invitations,
//! and the pure predicates that decide what a caller may see or change.

pub mod access;
pub mod event;
pub mod invitation;
pub mod session;
pub mod tenant;
pub mod token;
pub mod types;
pub mod user;

pub use access::{Decision, FieldOperation, FieldTarget, Filter};
pub use event::{Event, EventStatus};
pub use invitation::{Invitation, InvitationStatus};
pub use session::Session;
pub use tenant::{Membership, Tenant};
pub use token::{generate_token, hash_token};
pub use types::{
	EventId, GlobalRole, InvitationId, PricingPlan, SessionId, TenantId, TenantKind, TenantRole,
	UnknownVariant, UserId,
};
pub use user::{normalize_email, User};
