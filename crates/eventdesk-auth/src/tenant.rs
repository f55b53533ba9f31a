// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant types and membership resolution.
//!
//! This module provides:
//! - [`Tenant`] - an organization or team acting as a data-isolation boundary
//! - [`Membership`] - links users to a tenant with a scoped role
//!
//! The owner of a tenant is stored on the tenant itself and is never part of
//! [`Tenant::members`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PricingPlan, TenantId, TenantKind, TenantRole, UserId};

/// An organization or team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
	/// Unique identifier for this tenant.
	pub id: TenantId,

	/// Whether this tenant is an organization or a team.
	pub kind: TenantKind,

	/// Display name of the tenant.
	pub name: String,

	/// The single owner.
	pub owner: UserId,

	/// Non-owner members with their roles.
	#[serde(default)]
	pub members: Vec<Membership>,

	/// Commercial plan. Writable by platform admins only.
	#[serde(default)]
	pub pricing_plan: PricingPlan,

	/// When the tenant was created.
	pub created_at: DateTime<Utc>,

	/// When the tenant was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Tenant {
	/// Creates a new tenant owned by `owner` with no members.
	pub fn new(kind: TenantKind, name: impl Into<String>, owner: UserId) -> Self {
		let now = Utc::now();
		Self {
			id: TenantId::generate(),
			kind,
			name: name.into(),
			owner,
			members: Vec::new(),
			pricing_plan: PricingPlan::default(),
			created_at: now,
			updated_at: now,
		}
	}

	/// Convenience constructor for an organization.
	pub fn organization(name: impl Into<String>, owner: UserId) -> Self {
		Self::new(TenantKind::Organization, name, owner)
	}

	/// Convenience constructor for a team.
	pub fn team(name: impl Into<String>, owner: UserId) -> Self {
		Self::new(TenantKind::Team, name, owner)
	}

	/// Returns true if `user_id` owns this tenant.
	pub fn is_owner(&self, user_id: &UserId) -> bool {
		&self.owner == user_id
	}

	/// Resolves the role `user_id` holds in this tenant.
	///
	/// The owner always resolves to [`TenantRole::Owner`], even without a
	/// members entry. Otherwise the first matching members entry wins.
	pub fn role_of(&self, user_id: &UserId) -> Option<TenantRole> {
		if self.is_owner(user_id) {
			return Some(TenantRole::Owner);
		}
		self
			.members
			.iter()
			.find(|m| &m.user_id == user_id)
			.map(|m| m.role)
	}

	/// Returns true if `user_id` is the owner or a listed member.
	pub fn has_access(&self, user_id: &UserId) -> bool {
		self.role_of(user_id).is_some()
	}
}

/// A user's membership in a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
	/// The member.
	pub user_id: UserId,

	/// The member's role within the tenant.
	pub role: TenantRole,

	/// When this membership was created.
	pub created_at: DateTime<Utc>,
}

impl Membership {
	/// Creates a new membership with `created_at` set to now.
	pub fn new(user_id: UserId, role: TenantRole) -> Self {
		Self {
			user_id,
			role,
			created_at: Utc::now(),
		}
	}

	/// Returns true if this member has at least the given role's permissions.
	pub fn has_permission_of(&self, role: &TenantRole) -> bool {
		self.role.has_permission_of(role)
	}
}
