// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation of client supplied event identifiers.
//!
//! Page guards receive event ids from query strings. Before such an id scopes
//! anything it must name an event in one of the caller's tenants. Every
//! failure, including storage errors, answers `false`.

use eventdesk_auth::{EventId, Filter, User};
use eventdesk_db::{EventStore, TenantStore};

use crate::tenancy::get_user_tenant_ids;

/// Returns true if `event_id` names an event belonging to one of `user`'s
/// tenants.
#[tracing::instrument(skip(tenants, events, user, event_id))]
pub async fn validate_event_access(
	tenants: &dyn TenantStore,
	events: &dyn EventStore,
	user: Option<&User>,
	event_id: &str,
) -> bool {
	let Ok(event_id) = EventId::parse(event_id) else {
		tracing::debug!("rejecting malformed event id");
		return false;
	};

	let tenant_ids = match get_user_tenant_ids(tenants, user, None).await {
		Ok(ids) => ids,
		Err(e) => {
			tracing::warn!(error = %e, event_id = %event_id, "tenant resolution failed, denying event access");
			return false;
		}
	};
	if tenant_ids.is_empty() {
		return false;
	}

	let filter = Filter::and([
		Filter::IdEquals(event_id.into_inner()),
		Filter::TenantIn(tenant_ids),
	]);
	match events.count_events(&filter).await {
		Ok(count) => count > 0,
		Err(e) => {
			tracing::warn!(error = %e, event_id = %event_id, "event lookup failed, denying event access");
			false
		}
	}
}

/// Returns the parsed event id when `raw` is present and accessible.
pub async fn sanitize_event_param(
	tenants: &dyn TenantStore,
	events: &dyn EventStore,
	user: Option<&User>,
	raw: Option<&str>,
) -> Option<EventId> {
	let raw = raw?;
	if validate_event_access(tenants, events, user, raw).await {
		EventId::parse(raw).ok()
	} else {
		None
	}
}
