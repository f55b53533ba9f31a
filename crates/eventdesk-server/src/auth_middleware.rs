// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! Sessions are issued by an external sign-in service; this server only
//! resolves them. A request is authenticated by a session cookie or an
//! `Authorization: Bearer` header carrying the same session token.
//!
//! # Security Properties
//!
//! - Tokens are hashed with SHA-256 before lookup and never logged.
//! - Expired sessions are ignored.
//!
//! # Usage
//!
//! [`auth_layer`] stores an [`AuthContext`] on every request; handlers then
//! use [`RequireAuth`] or [`OptionalAuth`]:
//!
//! ```ignore
//! async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", user.user.display_name)
//! }
//! ```

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use eventdesk_auth::{hash_token, SessionId, User};
use eventdesk_db::{SessionStore, UserStore};
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use tracing::instrument;

use crate::{api::AppState, api_response::unauthorized};

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub user: User,
	pub session_id: SessionId,
}

/// Authentication state attached to each request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
		}
	}

	pub fn unauthenticated() -> Self {
		Self::default()
	}
}

/// Extract a cookie value by name from the Cookie header.
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let token = value.strip_prefix("Bearer ")?.trim();
	(!token.is_empty()).then(|| token.to_string())
}

/// Resolve the request's caller and store an [`AuthContext`] extension.
///
/// The session cookie is tried before the bearer token. Failed lookups leave
/// the request unauthenticated; rejecting is up to the extractor.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let headers = request.headers();
	let span = tracing::Span::current();

	let candidates = [
		(
			"session_cookie",
			extract_session_cookie(headers, &state.config.auth.session_cookie_name),
		),
		("bearer", extract_bearer_token(headers)),
	];

	for (method, token) in candidates {
		let Some(token) = token else {
			continue;
		};
		if let Some(current_user) =
			authenticate_session(&token, state.session_repo.as_ref(), state.user_repo.as_ref()).await
		{
			span.record("auth_method", method);
			span.record("user_id", tracing::field::display(&current_user.user.id));
			request
				.extensions_mut()
				.insert(AuthContext::authenticated(current_user));
			return next.run(request).await;
		}
	}

	span.record("auth_method", "none");
	request
		.extensions_mut()
		.insert(AuthContext::unauthenticated());
	next.run(request).await
}

/// Look up the session behind `token` and load its user.
#[instrument(skip_all, fields(session_id = tracing::field::Empty))]
pub async fn authenticate_session(
	token: &str,
	sessions: &dyn SessionStore,
	users: &dyn UserStore,
) -> Option<CurrentUser> {
	let token_hash = hash_token(token);

	let session = match sessions.get_active_session_by_token_hash(&token_hash).await {
		Ok(Some(session)) => session,
		Ok(None) => {
			tracing::debug!("no active session for token");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up session");
			return None;
		}
	};

	tracing::Span::current().record("session_id", tracing::field::display(&session.id));

	match users.get_user_by_id(&session.user_id).await {
		Ok(Some(user)) => Some(CurrentUser {
			user,
			session_id: session.id,
		}),
		Ok(None) => {
			tracing::warn!(user_id = %session.user_id, "user not found for active session");
			None
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up user");
			None
		}
	}
}

fn auth_context(parts: &Parts) -> AuthContext {
	parts
		.extensions
		.get::<AuthContext>()
		.cloned()
		.unwrap_or_else(AuthContext::unauthenticated)
}

/// Extractor that requires authentication. Rejects with 401.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match auth_context(parts).current_user {
			Some(user) => Ok(RequireAuth(user)),
			None => {
				tracing::debug!("authentication required: no valid credentials");
				Err(unauthorized().into_response())
			}
		}
	}
}

/// Extractor for optional authentication. Never rejects.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(auth_context(parts).current_user))
	}
}
