// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation workflow.
//!
//! An invitation moves from `pending` to exactly one of `accepted`,
//! `declined` or `expired` and never leaves that state. Tokens are handed out
//! once in plaintext; only their SHA-256 hash is stored.
//!
//! Acceptance is a single transaction in the store: the status flip is
//! conditional on the row still being pending, and the membership is upserted
//! in the same transaction, so concurrent accepts cannot both succeed.

use chrono::{DateTime, Utc};
use eventdesk_auth::access::owner_field_access;
use eventdesk_auth::{
	generate_token, hash_token, normalize_email, FieldTarget, Invitation, InvitationStatus, Tenant,
	TenantId, TenantKind, TenantRole, User,
};
use eventdesk_db::{DbError, InvitationStore, TenantStore};
use eventdesk_server_config::InvitationsConfig;

#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
	#[error("You must be signed in to respond to an invitation")]
	Unauthenticated,

	#[error("Invitation not found or token is invalid")]
	InvalidToken,

	#[error("This invitation has already been {0}")]
	AlreadyResolved(InvitationStatus),

	#[error("This invitation has expired")]
	Expired,

	#[error("This invitation was sent to a different email address")]
	EmailMismatch,

	#[error("Only the tenant owner or an administrator can manage invitations")]
	Forbidden,

	#[error("Invalid role: {0}")]
	InvalidRole(String),

	#[error("Invalid email address")]
	InvalidEmail,

	#[error("Tenant not found")]
	TenantNotFound,

	#[error("Database error: {0}")]
	Store(#[from] DbError),
}

impl InvitationError {
	/// Stable machine readable code for API responses.
	pub fn code(&self) -> &'static str {
		match self {
			InvitationError::Unauthenticated => "unauthenticated",
			InvitationError::InvalidToken => "invalid_token",
			InvitationError::AlreadyResolved(_) => "already_resolved",
			InvitationError::Expired => "expired",
			InvitationError::EmailMismatch => "email_mismatch",
			InvitationError::Forbidden => "forbidden",
			InvitationError::InvalidRole(_) => "invalid_role",
			InvitationError::InvalidEmail => "invalid_email",
			InvitationError::TenantNotFound => "not_found",
			InvitationError::Store(_) => "internal_error",
		}
	}
}

/// A freshly created invitation and its plaintext token.
#[derive(Debug)]
pub struct CreatedInvitation {
	pub invitation: Invitation,
	pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOutcome {
	pub tenant_id: TenantId,
	pub tenant_kind: TenantKind,
	pub role: TenantRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineOutcome {
	pub tenant_id: TenantId,
	pub tenant_kind: TenantKind,
}

/// What an invitee sees before responding.
#[derive(Debug)]
pub struct InvitationDetails {
	pub invitation: Invitation,
	pub tenant: Tenant,
	/// `expired` for a pending invitation past its expiry; not persisted.
	pub status: InvitationStatus,
	pub is_authenticated: bool,
	pub current_user_email: Option<String>,
	pub email_mismatch: bool,
}

/// Invitation operations over explicit store handles.
pub struct InvitationWorkflow<'a> {
	invitations: &'a dyn InvitationStore,
	tenants: &'a dyn TenantStore,
	config: &'a InvitationsConfig,
}

impl<'a> InvitationWorkflow<'a> {
	pub fn new(
		invitations: &'a dyn InvitationStore,
		tenants: &'a dyn TenantStore,
		config: &'a InvitationsConfig,
	) -> Self {
		Self {
			invitations,
			tenants,
			config,
		}
	}

	/// Invite `email` into `tenant_id` with `role` (default `viewer`).
	///
	/// # Errors
	/// - `Unauthenticated` without a caller
	/// - `TenantNotFound` if the tenant does not exist
	/// - `Forbidden` unless the caller is an admin or the tenant owner
	/// - `InvalidRole` for anything other than `editor` or `viewer`
	/// - `InvalidEmail` if `email` is not an address
	#[tracing::instrument(skip(self, caller, email, role), fields(tenant_id = %tenant_id))]
	pub async fn create(
		&self,
		caller: Option<&User>,
		tenant_id: &TenantId,
		email: &str,
		role: Option<&str>,
	) -> Result<CreatedInvitation, InvitationError> {
		let caller = caller.ok_or(InvitationError::Unauthenticated)?;

		let tenant = self
			.tenants
			.get_tenant(tenant_id)
			.await?
			.ok_or(InvitationError::TenantNotFound)?;

		let target = FieldTarget::Existing(tenant.role_of(&caller.id));
		if !owner_field_access(Some(caller), target) {
			tracing::debug!(actor_id = %caller.id, "invitation denied: caller is not owner");
			return Err(InvitationError::Forbidden);
		}

		let role = parse_invitable_role(role)?;
		let email = email.trim();
		if !is_plausible_email(email) {
			return Err(InvitationError::InvalidEmail);
		}

		let token = generate_token();
		let invitation = Invitation::new(
			tenant.id,
			email,
			role,
			caller.id,
			hash_token(&token),
			self.config.expiry_days,
		);
		self.invitations.create_invitation(&invitation).await?;

		tracing::info!(
			invitation_id = %invitation.id,
			tenant_id = %tenant.id,
			actor_id = %caller.id,
			role = %role,
			"invitation created"
		);

		Ok(CreatedInvitation { invitation, token })
	}

	/// Pending invitations of `tenant_id`, oldest first.
	///
	/// Invitations past their expiry are left out even before they are
	/// persisted as expired.
	///
	/// # Errors
	/// - `Unauthenticated` without a caller
	/// - `TenantNotFound` if the tenant does not exist
	/// - `Forbidden` unless the caller is an admin or the tenant owner
	#[tracing::instrument(skip(self, caller), fields(tenant_id = %tenant_id))]
	pub async fn list_pending(
		&self,
		caller: Option<&User>,
		tenant_id: &TenantId,
	) -> Result<Vec<Invitation>, InvitationError> {
		let caller = caller.ok_or(InvitationError::Unauthenticated)?;

		let tenant = self
			.tenants
			.get_tenant(tenant_id)
			.await?
			.ok_or(InvitationError::TenantNotFound)?;

		if !owner_field_access(Some(caller), FieldTarget::Existing(tenant.role_of(&caller.id))) {
			return Err(InvitationError::Forbidden);
		}

		let now = Utc::now();
		let mut pending = self.invitations.list_pending_invitations(tenant_id).await?;
		pending.retain(|invitation| !invitation.is_expired_at(now));
		Ok(pending)
	}

	/// Accept the invitation behind `token` as `caller`.
	#[tracing::instrument(skip(self, token, caller))]
	pub async fn accept(
		&self,
		token: &str,
		caller: Option<&User>,
	) -> Result<AcceptOutcome, InvitationError> {
		let (invitation, caller) = self.pending_for(token, caller, Utc::now()).await?;

		let tenant = self
			.tenants
			.get_tenant(&invitation.tenant_id)
			.await?
			.ok_or(InvitationError::TenantNotFound)?;

		if !self
			.invitations
			.accept_invitation(&invitation.id, &caller.id)
			.await?
		{
			return Err(self.lost_race(&invitation).await);
		}

		tracing::info!(
			invitation_id = %invitation.id,
			tenant_id = %tenant.id,
			user_id = %caller.id,
			role = %invitation.role,
			"invitation accepted"
		);

		Ok(AcceptOutcome {
			tenant_id: tenant.id,
			tenant_kind: tenant.kind,
			role: invitation.role,
		})
	}

	/// Decline the invitation behind `token`. Membership is untouched.
	#[tracing::instrument(skip(self, token, caller))]
	pub async fn decline(
		&self,
		token: &str,
		caller: Option<&User>,
	) -> Result<DeclineOutcome, InvitationError> {
		let (invitation, caller) = self.pending_for(token, caller, Utc::now()).await?;

		let tenant = self
			.tenants
			.get_tenant(&invitation.tenant_id)
			.await?
			.ok_or(InvitationError::TenantNotFound)?;

		if !self.invitations.decline_invitation(&invitation.id).await? {
			return Err(self.lost_race(&invitation).await);
		}

		tracing::info!(
			invitation_id = %invitation.id,
			tenant_id = %tenant.id,
			user_id = %caller.id,
			"invitation declined"
		);

		Ok(DeclineOutcome {
			tenant_id: tenant.id,
			tenant_kind: tenant.kind,
		})
	}

	/// Invitation metadata for display. Never changes state.
	#[tracing::instrument(skip(self, token, caller))]
	pub async fn describe(
		&self,
		token: &str,
		caller: Option<&User>,
	) -> Result<InvitationDetails, InvitationError> {
		let invitation = self
			.invitations
			.get_invitation_by_token_hash(&hash_token(token))
			.await?
			.ok_or(InvitationError::InvalidToken)?;

		let tenant = self
			.tenants
			.get_tenant(&invitation.tenant_id)
			.await?
			.ok_or(InvitationError::TenantNotFound)?;

		let email_mismatch =
			caller.is_some_and(|user| !self.emails_match(&user.email, &invitation.email));

		Ok(InvitationDetails {
			status: invitation.effective_status_at(Utc::now()),
			is_authenticated: caller.is_some(),
			current_user_email: caller.map(|user| user.email.clone()),
			email_mismatch,
			invitation,
			tenant,
		})
	}

	/// Preconditions shared by accept and decline, checked in order: caller,
	/// token, status, expiry, email.
	///
	/// An expired invitation is persisted as `expired` before failing, so the
	/// next attempt reports it as already resolved.
	async fn pending_for<'u>(
		&self,
		token: &str,
		caller: Option<&'u User>,
		now: DateTime<Utc>,
	) -> Result<(Invitation, &'u User), InvitationError> {
		let caller = caller.ok_or(InvitationError::Unauthenticated)?;

		let invitation = self
			.invitations
			.get_invitation_by_token_hash(&hash_token(token))
			.await?
			.ok_or(InvitationError::InvalidToken)?;

		if invitation.status != InvitationStatus::Pending {
			return Err(InvitationError::AlreadyResolved(invitation.status));
		}

		if invitation.is_expired_at(now) {
			if !self.invitations.expire_invitation(&invitation.id).await? {
				return Err(self.lost_race(&invitation).await);
			}
			tracing::info!(invitation_id = %invitation.id, "invitation expired on use");
			return Err(InvitationError::Expired);
		}

		if !self.emails_match(&caller.email, &invitation.email) {
			tracing::debug!(invitation_id = %invitation.id, user_id = %caller.id, "invitation email mismatch");
			return Err(InvitationError::EmailMismatch);
		}

		Ok((invitation, caller))
	}

	/// Error for a conditional update that found the row no longer pending.
	async fn lost_race(&self, invitation: &Invitation) -> InvitationError {
		match self.invitations.get_invitation_by_id(&invitation.id).await {
			Ok(Some(current)) => InvitationError::AlreadyResolved(current.status),
			Ok(None) => InvitationError::InvalidToken,
			Err(e) => InvitationError::Store(e),
		}
	}

	fn emails_match(&self, user_email: &str, invited_email: &str) -> bool {
		if self.config.case_sensitive_email {
			user_email == invited_email
		} else {
			normalize_email(user_email) == normalize_email(invited_email)
		}
	}
}

fn parse_invitable_role(role: Option<&str>) -> Result<TenantRole, InvitationError> {
	let Some(raw) = role else {
		return Ok(TenantRole::Viewer);
	};
	match raw.trim().parse::<TenantRole>() {
		Ok(role) if TenantRole::invitable().contains(&role) => Ok(role),
		_ => Err(InvitationError::InvalidRole(raw.to_string())),
	}
}

fn is_plausible_email(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) => {
			!local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
		}
		None => false,
	}
}
