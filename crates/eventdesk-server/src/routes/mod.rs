// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod events;
pub mod health;
pub mod invitations;
pub mod me;
pub mod tenants;
pub mod users;
