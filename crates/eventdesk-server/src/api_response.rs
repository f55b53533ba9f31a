// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API response helpers and macros.
//!
//! Every error body is an [`ErrorResponse`] with a human readable `error` and
//! a stable machine readable `code`.

use axum::{http::StatusCode, Json};
use eventdesk_server_api::ErrorResponse;

/// Parse an ID and return early with a 400 response if parsing fails.
///
/// # Example
///
/// ```ignore
/// let tenant_id = parse_id!(TenantId, tenant_id, "tenant");
/// ```
#[macro_export]
macro_rules! parse_id {
	($id_ty:ty, $raw:expr, $what:expr) => {
		match <$id_ty>::parse(&$raw) {
			Ok(id) => id,
			Err(_) => {
				return $crate::api_response::bad_request("invalid_id", format!("Invalid {} ID", $what))
					.into_response();
			}
		}
	};
}

/// Create a 400 Bad Request response.
pub fn bad_request(
	code: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
	(StatusCode::BAD_REQUEST, Json(ErrorResponse::new(code, message)))
}

/// Create a 401 Unauthorized response.
pub fn unauthorized() -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::UNAUTHORIZED,
		Json(ErrorResponse::new("unauthenticated", "Authentication required")),
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden(
	code: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
	(StatusCode::FORBIDDEN, Json(ErrorResponse::new(code, message)))
}

/// Create a 404 Not Found response.
pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
	(StatusCode::NOT_FOUND, Json(ErrorResponse::new("not_found", message)))
}

/// Create a 500 Internal Server Error response.
///
/// The message is fixed so storage details never reach the client.
pub fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ErrorResponse::new("internal_error", "An internal error occurred")),
	)
}
