// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure access predicates.
//!
//! Every predicate checks platform roles first: super-admins and admins pass
//! unconditionally. A missing caller is always denied, never an error.
//! Predicates that need tenant membership take the already-resolved role or
//! tenant IDs as input; the store-backed wrappers live in the server crate.

use tracing::instrument;

use super::decision::{Decision, Filter};
use crate::types::{GlobalRole, TenantId, TenantRole};
use crate::user::User;

const ADMIN_ROLES: &[GlobalRole] = &[GlobalRole::SuperAdmin, GlobalRole::Admin];

/// Returns true if the user holds any of the `allowed` global roles.
pub fn check_role(allowed: &[GlobalRole], user: Option<&User>) -> bool {
	match user {
		Some(user) => user.roles.iter().any(|role| allowed.contains(role)),
		None => false,
	}
}

/// Returns true for super-admins and admins.
pub fn is_admin(user: Option<&User>) -> bool {
	check_role(ADMIN_ROLES, user)
}

/// Gate for writes to admin-managed collections.
pub fn can_edit_collection(user: Option<&User>) -> bool {
	is_admin(user)
}

/// Gate for reads of admin-managed collections.
pub fn can_view_collection(user: Option<&User>) -> bool {
	is_admin(user)
}

/// Any authenticated caller may create a tenant and becomes its owner.
pub fn tenant_create_access(user: Option<&User>) -> bool {
	user.is_some()
}

/// Visibility for collections whose rows belong to a tenant.
///
/// Admins see everything. Other callers see rows of the tenants they belong
/// to, and are denied outright when they belong to none.
#[instrument(level = "debug", skip(user, tenant_ids), fields(tenants = tenant_ids.len()))]
pub fn tenant_scoped_access(user: Option<&User>, tenant_ids: &[TenantId]) -> Decision {
	if is_admin(user) {
		return Decision::Allow;
	}
	if user.is_none() || tenant_ids.is_empty() {
		return Decision::Deny;
	}
	Decision::AllowWithFilter(Filter::TenantIn(tenant_ids.to_vec()))
}

/// What a field-level check is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
	/// The document is being created and has no id yet.
	NewDocument,
	/// An existing document, with the caller's resolved role in its tenant.
	Existing(Option<TenantRole>),
}

/// Field-level gate for fields only a tenant owner may change.
///
/// New documents pass for any authenticated caller; the collection create
/// gate runs separately.
pub fn owner_field_access(user: Option<&User>, target: FieldTarget) -> bool {
	if is_admin(user) {
		return true;
	}
	if user.is_none() {
		return false;
	}
	match target {
		FieldTarget::NewDocument => true,
		FieldTarget::Existing(role) => role == Some(TenantRole::Owner),
	}
}

/// Field operation being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOperation {
	Read,
	Write,
}

/// Field-level gate for `pricing_plan`: readable by members, writable by
/// admins only.
pub fn pricing_plan_field_access(user: Option<&User>, operation: FieldOperation) -> bool {
	if is_admin(user) {
		return true;
	}
	match operation {
		FieldOperation::Read => user.is_some(),
		FieldOperation::Write => false,
	}
}

/// Whether a caller holding `role` may create or modify content in a tenant.
pub fn tenant_content_write_access(user: Option<&User>, role: Option<TenantRole>) -> bool {
	if is_admin(user) {
		return true;
	}
	user.is_some() && role.is_some_and(|r| r.has_permission_of(&TenantRole::Editor))
}
