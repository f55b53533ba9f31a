// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for tenancy and authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`TenantId`],
//!   [`EventId`], [`InvitationId`], [`SessionId`]) preventing accidental mixing
//! - **Role enums**: closed sets for global ([`GlobalRole`]) and tenant-scoped
//!   ([`TenantRole`]) roles
//! - **Tenant kinds**: organizations and teams share one model, tagged with
//!   [`TenantKind`]
//!
//! Every enum here round-trips through its `Display` string via `FromStr`, which
//! is the representation used in SQLite columns and JSON bodies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}

			/// Parse an ID from untrusted input.
			pub fn parse(s: &str) -> Result<Self, uuid::Error> {
				Uuid::parse_str(s.trim()).map(Self)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(TenantId, "Unique identifier for a tenant (organization or team).");
define_id_type!(EventId, "Unique identifier for an event.");
define_id_type!(InvitationId, "Unique identifier for an invitation.");
define_id_type!(SessionId, "Unique identifier for a session.");

/// Error returned when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
	pub kind: &'static str,
	pub value: String,
}

impl UnknownVariant {
	fn new(kind: &'static str, value: &str) -> Self {
		Self {
			kind,
			value: value.to_string(),
		}
	}
}

// =============================================================================
// Global Roles
// =============================================================================

/// User-level roles that apply regardless of tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalRole {
	/// Full platform control.
	SuperAdmin,
	/// Platform administration.
	Admin,
}

impl GlobalRole {
	/// Returns all available global roles.
	pub fn all() -> &'static [GlobalRole] {
		&[GlobalRole::SuperAdmin, GlobalRole::Admin]
	}
}

impl fmt::Display for GlobalRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GlobalRole::SuperAdmin => write!(f, "super-admin"),
			GlobalRole::Admin => write!(f, "admin"),
		}
	}
}

impl FromStr for GlobalRole {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"super-admin" => Ok(GlobalRole::SuperAdmin),
			"admin" => Ok(GlobalRole::Admin),
			other => Err(UnknownVariant::new("global role", other)),
		}
	}
}

// =============================================================================
// Tenant Roles
// =============================================================================

/// Roles held within a single tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
	/// Owns the tenant. Exactly one per tenant.
	Owner,
	/// Can manage the tenant's events and content.
	Editor,
	/// Read-only access.
	Viewer,
}

impl TenantRole {
	/// Returns all available tenant roles.
	pub fn all() -> &'static [TenantRole] {
		&[TenantRole::Owner, TenantRole::Editor, TenantRole::Viewer]
	}

	/// Roles that may be granted through an invitation.
	pub fn invitable() -> &'static [TenantRole] {
		&[TenantRole::Editor, TenantRole::Viewer]
	}

	/// Returns true if this role has at least the permissions of the given role.
	pub fn has_permission_of(&self, other: &TenantRole) -> bool {
		matches!(
			(self, other),
			(TenantRole::Owner, _)
				| (TenantRole::Editor, TenantRole::Editor | TenantRole::Viewer)
				| (TenantRole::Viewer, TenantRole::Viewer)
		)
	}
}

impl fmt::Display for TenantRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TenantRole::Owner => write!(f, "owner"),
			TenantRole::Editor => write!(f, "editor"),
			TenantRole::Viewer => write!(f, "viewer"),
		}
	}
}

impl FromStr for TenantRole {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"owner" => Ok(TenantRole::Owner),
			"editor" => Ok(TenantRole::Editor),
			"viewer" => Ok(TenantRole::Viewer),
			other => Err(UnknownVariant::new("tenant role", other)),
		}
	}
}

// =============================================================================
// Tenant Kind
// =============================================================================

/// The kind of data-isolation boundary a tenant represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantKind {
	Organization,
	Team,
}

impl fmt::Display for TenantKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TenantKind::Organization => write!(f, "organization"),
			TenantKind::Team => write!(f, "team"),
		}
	}
}

impl FromStr for TenantKind {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"organization" => Ok(TenantKind::Organization),
			"team" => Ok(TenantKind::Team),
			other => Err(UnknownVariant::new("tenant kind", other)),
		}
	}
}

// =============================================================================
// Pricing Plan
// =============================================================================

/// Commercial plan attached to a tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPlan {
	#[default]
	Free,
	Pro,
	Enterprise,
}

impl fmt::Display for PricingPlan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PricingPlan::Free => write!(f, "free"),
			PricingPlan::Pro => write!(f, "pro"),
			PricingPlan::Enterprise => write!(f, "enterprise"),
		}
	}
}

impl FromStr for PricingPlan {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"free" => Ok(PricingPlan::Free),
			"pro" => Ok(PricingPlan::Pro),
			"enterprise" => Ok(PricingPlan::Enterprise),
			other => Err(UnknownVariant::new("pricing plan", other)),
		}
	}
}
