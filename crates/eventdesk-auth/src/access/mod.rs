// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control for tenant-scoped data.
//!
//! Evaluation is two-phase:
//!
//! 1. **Global role check**: super-admins and admins pass every predicate
//! 2. **Tenant check**: the caller's resolved role or tenant set decides
//!
//! All functions here are pure. Resolving roles from storage is the caller's
//! job.

mod decision;
mod predicates;

pub use decision::{Decision, Filter, Row};
pub use predicates::{
	can_edit_collection, can_view_collection, check_role, is_admin, owner_field_access,
	pricing_plan_field_access, tenant_content_write_access, tenant_create_access,
	tenant_scoped_access, FieldOperation, FieldTarget,
};
