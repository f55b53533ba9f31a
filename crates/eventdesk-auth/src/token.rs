// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque bearer tokens for invitations and sessions.
//!
//! Plaintext tokens are handed to the client exactly once. Only their SHA-256
//! hash is persisted, so a leaked database does not leak usable tokens.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a token before hex encoding.
pub const TOKEN_BYTES: usize = 32;

/// Generates a random token as 64 lowercase hex characters.
pub fn generate_token() -> String {
	let mut bytes = [0u8; TOKEN_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}

/// Hashes a token for storage and lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
