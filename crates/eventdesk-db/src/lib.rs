// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for eventdesk.
//!
//! Each repository owns a cloned [`SqlitePool`] and implements a `*Store`
//! trait so callers can depend on the trait and substitute test doubles.

pub mod error;
pub mod event;
pub mod invitation;
pub mod migrations;
pub mod pool;
mod row;
pub mod session;
pub mod tenant;
pub mod testing;
pub mod user;

pub use error::{DbError, Result};
pub use event::{EventRepository, EventStore};
pub use invitation::{InvitationRepository, InvitationStore};
pub use migrations::run_migrations;
pub use pool::{create_pool, ping};
pub use session::{SessionRepository, SessionStore};
pub use tenant::{TenantRepository, TenantStore};
pub use user::{UserRepository, UserStore};

pub use sqlx::sqlite::SqlitePool;
