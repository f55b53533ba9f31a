// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.
//!
//! Storage failures are logged here and surface to clients as a generic 500.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use eventdesk_db::DbError;
use eventdesk_server_api::ErrorResponse;

use crate::api_response::internal_error;
use crate::invitation_flow::InvitationError;
use crate::tenancy::TenancyError;

/// Errors raised while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		tracing::error!(error = %self, "server error");
		internal_error().into_response()
	}
}

impl InvitationError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			InvitationError::Unauthenticated => StatusCode::UNAUTHORIZED,
			InvitationError::InvalidToken | InvitationError::TenantNotFound => StatusCode::NOT_FOUND,
			InvitationError::Forbidden => StatusCode::FORBIDDEN,
			InvitationError::AlreadyResolved(_)
			| InvitationError::Expired
			| InvitationError::EmailMismatch
			| InvitationError::InvalidRole(_)
			| InvitationError::InvalidEmail => StatusCode::BAD_REQUEST,
			InvitationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for InvitationError {
	fn into_response(self) -> Response {
		if let InvitationError::Store(e) = &self {
			tracing::error!(error = %e, "invitation store error");
			return internal_error().into_response();
		}
		(
			self.status_code(),
			Json(ErrorResponse::new(self.code(), self.to_string())),
		)
			.into_response()
	}
}

impl IntoResponse for TenancyError {
	fn into_response(self) -> Response {
		let (status, code) = match &self {
			TenancyError::Db(e) => {
				tracing::error!(error = %e, "tenancy store error");
				return internal_error().into_response();
			}
			TenancyError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
			TenancyError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
			TenancyError::OwnsTenants(_) => (StatusCode::CONFLICT, "owns_tenants"),
		};
		(status, Json(ErrorResponse::new(code, self.to_string()))).into_response()
	}
}
