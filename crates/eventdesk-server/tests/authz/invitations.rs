// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use eventdesk_auth::TenantRole;
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_invitation_create_authorization() {
	let app = TestApp::new().await;
	let path = format!("/api/tenants/{}/invitations", app.fixtures.org_a.org.id);

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_invite",
			method: Method::POST,
			path: path.clone(),
			user: None,
			body: Some(json!({"email": "new@guest.test"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "owner_can_invite",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"email": "new@guest.test", "role": "editor"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_can_invite",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"email": "other@guest.test"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "editor_cannot_invite",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: Some(json!({"email": "new@guest.test"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_owner_cannot_invite",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.org_b.owner.clone()),
			body: Some(json!({"email": "new@guest.test"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_role_cannot_be_granted",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"email": "new@guest.test", "role": "owner"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "malformed_email_is_rejected",
			method: Method::POST,
			path: path.clone(),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"email": "not-an-email"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_tenant_is_not_found",
			method: Method::POST,
			path: format!("/api/tenants/{}/invitations", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"email": "new@guest.test"})),
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_invitation_list_authorization() {
	let app = TestApp::new().await;
	let path = format!("/api/tenants/{}/invitations", app.fixtures.org_a.org.id);

	let cases = vec![
		AuthzCase {
			name: "owner_can_list_invitations",
			method: Method::GET,
			path: path.clone(),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin_can_list_invitations",
			method: Method::GET,
			path: path.clone(),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "editor_cannot_list_invitations",
			method: Method::GET,
			path: path.clone(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "anonymous_cannot_list_invitations",
			method: Method::GET,
			path,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn listing_shows_pending_without_tokens() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let token = app.invite(&org.org, &org.owner, "pending@eventdesk.test", "editor").await;
	app.expired_invitation(&org.org, &org.owner, "stale@eventdesk.test").await;

	let response = app
		.get(&format!("/api/tenants/{}/invitations", org.org.id), Some(&org.owner))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = json_body(response).await;
	let invitations = body["invitations"].as_array().unwrap();
	assert_eq!(invitations.len(), 1);
	assert_eq!(invitations[0]["email"], "pending@eventdesk.test");
	assert_eq!(invitations[0]["role"], "editor");
	assert_eq!(invitations[0]["invited_by"], org.owner.id());
	assert!(!body.to_string().contains(&token));
}

#[tokio::test]
async fn created_invitation_returns_token_once() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.post(
			&format!("/api/tenants/{}/invitations", org.org.id),
			Some(&org.owner),
			json!({"email": "guest@eventdesk.test"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = json_body(response).await;
	let token = body["token"].as_str().unwrap();
	assert_eq!(body["role"], "viewer");
	assert_eq!(
		body["accept_url"],
		format!("http://eventdesk.test/accept-invitation?token={token}")
	);

	let details = json_body(
		app.get(&format!("/api/accept-invitation?token={token}"), None)
			.await,
	)
	.await;
	assert_eq!(details["status"], "pending");
	assert_eq!(details["tenant_name"], org.org.name.as_str());
	assert!(details.get("token").is_none());
}

#[tokio::test]
async fn accepting_grants_membership_once() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let outsider = &app.fixtures.outsider;
	let token = app
		.invite(&org.org, &org.owner, &outsider.user.email, "editor")
		.await;

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["success"], true);
	assert_eq!(body["action"], "accept");
	assert_eq!(body["role"], "editor");
	assert_eq!(body["tenant_id"], org.org.id.to_string());
	assert_eq!(body["tenant_kind"], "organization");

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.role_of(&outsider.user.id), Some(TenantRole::Editor));

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = json_body(response).await;
	assert_eq!(body["code"], "already_resolved");
	assert_eq!(body["error"], "This invitation has already been accepted");
}

#[tokio::test]
async fn accepting_requires_a_session() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let token = app
		.invite(&org.org, &org.owner, "guest@eventdesk.test", "viewer")
		.await;

	let response = app
		.post("/api/accept-invitation", None, json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_is_not_found() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/accept-invitation",
			Some(&app.fixtures.outsider),
			json!({"token": "no-such-token"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(json_body(response).await["code"], "invalid_token");

	let response = app
		.get("/api/accept-invitation?token=no-such-token", None)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_must_match_invitation() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let outsider = &app.fixtures.outsider;
	let token = app
		.invite(&org.org, &org.owner, "someone-else@eventdesk.test", "viewer")
		.await;

	let details = json_body(
		app.get(&format!("/api/accept-invitation?token={token}"), Some(outsider))
			.await,
	)
	.await;
	assert_eq!(details["is_authenticated"], true);
	assert_eq!(details["email_mismatch"], true);
	assert_eq!(details["current_user_email"], outsider.user.email.as_str());

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json_body(response).await["code"], "email_mismatch");

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.role_of(&outsider.user.id), None);
}

#[tokio::test]
async fn email_match_ignores_case() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let outsider = &app.fixtures.outsider;
	let token = app
		.invite(&org.org, &org.owner, &outsider.user.email.to_uppercase(), "viewer")
		.await;

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_invitation_cannot_be_accepted() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let outsider = &app.fixtures.outsider;
	let token = app
		.expired_invitation(&org.org, &org.owner, &outsider.user.email)
		.await;

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json_body(response).await["code"], "expired");

	let details = json_body(
		app.get(&format!("/api/accept-invitation?token={token}"), None)
			.await,
	)
	.await;
	assert_eq!(details["status"], "expired");
	assert_eq!(details["is_authenticated"], false);
}

#[tokio::test]
async fn declined_invitation_cannot_be_accepted() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let outsider = &app.fixtures.outsider;
	let token = app
		.invite(&org.org, &org.owner, &outsider.user.email, "viewer")
		.await;

	let response = app
		.post(
			"/api/accept-invitation",
			Some(outsider),
			json!({"token": token, "action": "decline"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["action"], "decline");
	assert!(body.get("role").is_none());

	let response = app
		.post("/api/accept-invitation", Some(outsider), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		json_body(response).await["error"],
		"This invitation has already been declined"
	);

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.role_of(&outsider.user.id), None);
}

#[tokio::test]
async fn accepting_a_team_invitation_updates_team_ids() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let guest = app.create_user("guest@eventdesk.test").await;
	let token = app.invite(&org.team, &org.owner, "guest@eventdesk.test", "viewer").await;

	let response = app
		.post("/api/accept-invitation", Some(&guest), json!({"token": token}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["tenant_kind"], "team");

	let tenancy = json_body(app.get("/api/me/tenancy", Some(&guest)).await).await;
	assert_eq!(tenancy["team_ids"], json!([org.team.id.to_string()]));
	assert_eq!(tenancy["organization_ids"], json!([]));
	assert_eq!(tenancy["default_team_id"], org.team.id.to_string());
}
