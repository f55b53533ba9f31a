// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod events;
mod invitations;
mod me;
mod support;
mod tenants;
mod users;
