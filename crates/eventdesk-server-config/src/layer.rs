// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from a single source.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, InvitationsConfigLayer,
	LoggingConfigLayer,
};

/// Every section is optional so a source only overrides what it sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub invitations: Option<InvitationsConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
}

macro_rules! merge_section {
	($self:ident, $other:ident, $field:ident) => {
		if let Some(incoming) = $other.$field {
			match $self.$field.as_mut() {
				Some(existing) => existing.merge(incoming),
				None => $self.$field = Some(incoming),
			}
		}
	};
}

impl ServerConfigLayer {
	/// Overlay `other` on top of `self`. Fields set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section!(self, other, http);
		merge_section!(self, other, database);
		merge_section!(self, other, logging);
		merge_section!(self, other, invitations);
		merge_section!(self, other, auth);
	}
}
