// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Store-backed tenancy resolution.
//!
//! Resolvers here come in two flavours that differ only in how they treat
//! storage failures:
//!
//! - **Access decisions** (`*_field_access`, [`tenant_scoped_access_for`]) fail
//!   closed: an error denies.
//! - **Default values** ([`default_tenant_id`]) log at `warn` and fall back to
//!   no default.
//!
//! The plain resolvers propagate [`DbError`] so callers choose.

use std::collections::HashSet;

use eventdesk_auth::access::{
	is_admin, owner_field_access, tenant_content_write_access, tenant_scoped_access,
};
use eventdesk_auth::{Decision, FieldTarget, Tenant, TenantId, TenantKind, TenantRole, User, UserId};
use eventdesk_db::{DbError, TenantStore, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("{0} not found")]
	NotFound(&'static str),

	#[error("Forbidden: {0}")]
	Forbidden(&'static str),

	#[error("User owns {0} tenant(s); transfer ownership or delete them first")]
	OwnsTenants(i64),
}

// =============================================================================
// Membership resolver
// =============================================================================

/// Role `user` holds in `tenant_id`, or `None` when the tenant or the user is
/// missing.
#[tracing::instrument(skip(tenants, user), fields(tenant_id = %tenant_id))]
pub async fn get_tenant_role(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: &TenantId,
) -> Result<Option<TenantRole>, DbError> {
	role_in_tenant_of_kind(tenants, user, tenant_id, None).await
}

/// Like [`get_tenant_role`], but a team resolves to `None`.
pub async fn get_organization_role(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: &TenantId,
) -> Result<Option<TenantRole>, DbError> {
	role_in_tenant_of_kind(tenants, user, tenant_id, Some(TenantKind::Organization)).await
}

/// Like [`get_tenant_role`], but an organization resolves to `None`.
pub async fn get_team_role(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: &TenantId,
) -> Result<Option<TenantRole>, DbError> {
	role_in_tenant_of_kind(tenants, user, tenant_id, Some(TenantKind::Team)).await
}

async fn role_in_tenant_of_kind(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: &TenantId,
	kind: Option<TenantKind>,
) -> Result<Option<TenantRole>, DbError> {
	let Some(user) = user else {
		return Ok(None);
	};
	let Some(tenant) = tenants.get_tenant(tenant_id).await? else {
		return Ok(None);
	};
	if kind.is_some_and(|k| k != tenant.kind) {
		return Ok(None);
	}
	Ok(tenant.role_of(&user.id))
}

// =============================================================================
// Tenant ID resolver
// =============================================================================

/// Every tenant `user` owns or belongs to, optionally of one kind.
///
/// Owned tenants come first in creation order, followed by member tenants.
/// Each id appears once.
#[tracing::instrument(skip(tenants, user), fields(kind = ?kind))]
pub async fn get_user_tenant_ids(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	kind: Option<TenantKind>,
) -> Result<Vec<TenantId>, DbError> {
	let Some(user) = user else {
		return Ok(Vec::new());
	};

	let (owned, member) = futures::try_join!(
		tenants.list_owned_tenant_ids(&user.id, kind),
		tenants.list_member_tenant_ids(&user.id, kind),
	)?;

	Ok(merge_tenant_ids(owned, member))
}

pub async fn get_user_organization_ids(
	tenants: &dyn TenantStore,
	user: Option<&User>,
) -> Result<Vec<TenantId>, DbError> {
	get_user_tenant_ids(tenants, user, Some(TenantKind::Organization)).await
}

pub async fn get_user_team_ids(
	tenants: &dyn TenantStore,
	user: Option<&User>,
) -> Result<Vec<TenantId>, DbError> {
	get_user_tenant_ids(tenants, user, Some(TenantKind::Team)).await
}

fn merge_tenant_ids(owned: Vec<TenantId>, member: Vec<TenantId>) -> Vec<TenantId> {
	let mut seen = HashSet::new();
	owned
		.into_iter()
		.chain(member)
		.filter(|id| seen.insert(*id))
		.collect()
}

/// The tenant to preselect for `user`: their only tenant of `kind`, if they
/// have exactly one.
pub async fn default_tenant_id(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	kind: Option<TenantKind>,
) -> Option<TenantId> {
	match get_user_tenant_ids(tenants, user, kind).await {
		Ok(ids) => sole_tenant_id(&ids),
		Err(e) => {
			tracing::warn!(error = %e, kind = ?kind, "failed to resolve default tenant");
			None
		}
	}
}

/// The only entry of an already resolved ID list, if it has exactly one.
pub fn sole_tenant_id(ids: &[TenantId]) -> Option<TenantId> {
	match ids {
		[only] => Some(*only),
		_ => None,
	}
}

// =============================================================================
// Store-backed access predicates
// =============================================================================

/// Scoped visibility over tenant-owned rows for `user`.
pub async fn tenant_scoped_access_for(tenants: &dyn TenantStore, user: Option<&User>) -> Decision {
	if is_admin(user) {
		return Decision::Allow;
	}
	match get_user_tenant_ids(tenants, user, None).await {
		Ok(ids) => tenant_scoped_access(user, &ids),
		Err(e) => {
			tracing::warn!(error = %e, "tenant resolution failed, denying access");
			Decision::Deny
		}
	}
}

/// Owner-only field gate for a tenant of any kind.
///
/// `tenant_id` is `None` while the tenant is being created.
pub async fn tenant_owner_field_access(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	kind: Option<TenantKind>,
	tenant_id: Option<&TenantId>,
) -> bool {
	if is_admin(user) {
		return true;
	}
	let Some(tenant_id) = tenant_id else {
		return owner_field_access(user, FieldTarget::NewDocument);
	};
	match role_in_tenant_of_kind(tenants, user, tenant_id, kind).await {
		Ok(role) => owner_field_access(user, FieldTarget::Existing(role)),
		Err(e) => {
			tracing::warn!(error = %e, tenant_id = %tenant_id, "role lookup failed, denying field access");
			false
		}
	}
}

pub async fn organization_owner_field_access(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: Option<&TenantId>,
) -> bool {
	tenant_owner_field_access(tenants, user, Some(TenantKind::Organization), tenant_id).await
}

pub async fn team_owner_field_access(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: Option<&TenantId>,
) -> bool {
	tenant_owner_field_access(tenants, user, Some(TenantKind::Team), tenant_id).await
}

/// Whether `user` may create or change content such as events in `tenant_id`.
pub async fn can_write_tenant_content(
	tenants: &dyn TenantStore,
	user: Option<&User>,
	tenant_id: &TenantId,
) -> bool {
	if is_admin(user) {
		return true;
	}
	match get_tenant_role(tenants, user, tenant_id).await {
		Ok(role) => tenant_content_write_access(user, role),
		Err(e) => {
			tracing::warn!(error = %e, tenant_id = %tenant_id, "role lookup failed, denying write");
			false
		}
	}
}

// =============================================================================
// Ownership lifecycle
// =============================================================================

/// Hand `tenant_id` to `new_owner`. The previous owner stays on as an editor.
///
/// # Errors
/// - `NotFound` if the tenant or the new owner does not exist
/// - `Forbidden` unless `caller` is an admin or the current owner
#[tracing::instrument(skip(tenants, users, caller), fields(actor_id = %caller.id, tenant_id = %tenant_id, new_owner = %new_owner))]
pub async fn transfer_ownership(
	tenants: &dyn TenantStore,
	users: &dyn UserStore,
	caller: &User,
	tenant_id: &TenantId,
	new_owner: &UserId,
) -> Result<Tenant, TenancyError> {
	let tenant = tenants
		.get_tenant(tenant_id)
		.await?
		.ok_or(TenancyError::NotFound("Tenant"))?;

	let target = FieldTarget::Existing(tenant.role_of(&caller.id));
	if !owner_field_access(Some(caller), target) {
		return Err(TenancyError::Forbidden("only the owner can transfer ownership"));
	}

	if users.get_user_by_id(new_owner).await?.is_none() {
		return Err(TenancyError::NotFound("User"));
	}

	tenants.transfer_ownership(tenant_id, new_owner).await?;

	tracing::info!(tenant_id = %tenant_id, previous_owner = %tenant.owner, new_owner = %new_owner, "tenant ownership transferred");

	tenants
		.get_tenant(tenant_id)
		.await?
		.ok_or(TenancyError::NotFound("Tenant"))
}

/// Delete `user_id` together with their memberships and sessions.
///
/// # Returns
/// `false` if the user did not exist.
///
/// # Errors
/// - `Forbidden` unless `caller` is an admin or the user themselves
/// - `OwnsTenants` while the user still owns a tenant
#[tracing::instrument(skip(tenants, users, caller), fields(actor_id = %caller.id, user_id = %user_id))]
pub async fn delete_user(
	tenants: &dyn TenantStore,
	users: &dyn UserStore,
	caller: &User,
	user_id: &UserId,
) -> Result<bool, TenancyError> {
	if !is_admin(Some(caller)) && caller.id != *user_id {
		return Err(TenancyError::Forbidden("cannot delete another user"));
	}

	let owned = tenants.count_owned_tenants(user_id).await?;
	if owned > 0 {
		return Err(TenancyError::OwnsTenants(owned));
	}

	let deleted = users.delete_user(user_id).await?;
	if deleted {
		tracing::info!(user_id = %user_id, "user deleted");
	}
	Ok(deleted)
}

/// Delete `tenant_id`. Members, events and invitations go with it.
///
/// # Errors
/// - `NotFound` if the tenant does not exist
/// - `Forbidden` unless `caller` is an admin or the owner
#[tracing::instrument(skip(tenants, caller), fields(actor_id = %caller.id, tenant_id = %tenant_id))]
pub async fn delete_tenant(
	tenants: &dyn TenantStore,
	caller: &User,
	tenant_id: &TenantId,
) -> Result<(), TenancyError> {
	let tenant = tenants
		.get_tenant(tenant_id)
		.await?
		.ok_or(TenancyError::NotFound("Tenant"))?;

	let target = FieldTarget::Existing(tenant.role_of(&caller.id));
	if !owner_field_access(Some(caller), target) {
		return Err(TenancyError::Forbidden("only the owner can delete a tenant"));
	}

	if !tenants.delete_tenant(tenant_id).await? {
		return Err(TenancyError::NotFound("Tenant"));
	}

	tracing::info!(tenant_id = %tenant_id, kind = %tenant.kind, owner = %tenant.owner, "tenant deleted");
	Ok(())
}

/// Remove `user_id` from the members of `tenant_id`.
///
/// Owners and admins may remove anyone; any member may remove themselves.
/// The owner is not a member entry and cannot be removed this way.
///
/// # Errors
/// - `NotFound` if the tenant does not exist or `user_id` is not a member
/// - `Forbidden` for anyone else
#[tracing::instrument(skip(tenants, caller), fields(actor_id = %caller.id, tenant_id = %tenant_id, user_id = %user_id))]
pub async fn remove_member(
	tenants: &dyn TenantStore,
	caller: &User,
	tenant_id: &TenantId,
	user_id: &UserId,
) -> Result<(), TenancyError> {
	let tenant = tenants
		.get_tenant(tenant_id)
		.await?
		.ok_or(TenancyError::NotFound("Tenant"))?;

	let caller_role = tenant.role_of(&caller.id);
	let leaving = caller.id == *user_id && caller_role.is_some();
	if !leaving && !owner_field_access(Some(caller), FieldTarget::Existing(caller_role)) {
		return Err(TenancyError::Forbidden("only the owner can remove members"));
	}

	if tenant.is_owner(user_id) {
		return Err(TenancyError::Forbidden("the owner cannot be removed; transfer ownership first"));
	}

	if !tenants.remove_member(tenant_id, user_id).await? {
		return Err(TenancyError::NotFound("Member"));
	}

	tracing::info!(tenant_id = %tenant_id, user_id = %user_id, "member removed");
	Ok(())
}
