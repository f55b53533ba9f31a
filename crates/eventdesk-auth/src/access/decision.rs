// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access decisions and row filters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TenantId;

/// Outcome of an access predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "filter", rename_all = "snake_case")]
pub enum Decision {
	Allow,
	Deny,
	/// Allowed, restricted to rows matching the filter.
	AllowWithFilter(Filter),
}

impl Decision {
	/// Returns true for `Allow` and `AllowWithFilter`.
	pub fn is_allowed(&self) -> bool {
		!matches!(self, Decision::Deny)
	}

	/// Returns the filter if this decision carries one.
	pub fn filter(&self) -> Option<&Filter> {
		match self {
			Decision::AllowWithFilter(filter) => Some(filter),
			_ => None,
		}
	}

	/// Evaluates this decision against a single row.
	pub fn permits(&self, row: &Row) -> bool {
		match self {
			Decision::Allow => true,
			Decision::Deny => false,
			Decision::AllowWithFilter(filter) => filter.matches(row),
		}
	}
}

/// A conjunctive row filter.
///
/// Translated to SQL by the storage layer; [`Filter::matches`] evaluates the
/// same semantics in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
	/// The row's id equals the value.
	IdEquals(Uuid),
	/// The row's tenant is one of the listed tenants. An empty list matches
	/// nothing.
	TenantIn(Vec<TenantId>),
	/// Every sub-filter matches. An empty list matches everything.
	And(Vec<Filter>),
}

impl Filter {
	pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
		Filter::And(filters.into_iter().collect())
	}

	pub fn matches(&self, row: &Row) -> bool {
		match self {
			Filter::IdEquals(id) => row.id == *id,
			Filter::TenantIn(ids) => row.tenant_id.is_some_and(|t| ids.contains(&t)),
			Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
		}
	}
}

/// The attributes of a row that filters inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
	pub id: Uuid,
	pub tenant_id: Option<TenantId>,
}
