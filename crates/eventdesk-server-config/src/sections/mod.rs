// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each has a resolved `*Config` and a partial
//! `*ConfigLayer` used while merging sources.

mod auth;
mod database;
mod http;
mod invitations;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer, DEFAULT_MAX_CONNECTIONS};
pub use http::{HttpConfig, HttpConfigLayer};
pub use invitations::{InvitationsConfig, InvitationsConfigLayer, MAX_EXPIRY_DAYS};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
