// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_user_delete_authorization() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_delete",
			method: Method::DELETE,
			path: format!("/api/users/{}", org.viewer.id()),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member_cannot_delete_another_user",
			method: Method::DELETE,
			path: format!("/api/users/{}", org.viewer.id()),
			user: Some(org.editor.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_cannot_delete_self_while_owning",
			method: Method::DELETE,
			path: format!("/api/users/{}", org.owner.id()),
			user: Some(org.owner.clone()),
			body: None,
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "admin_cannot_delete_owner_either",
			method: Method::DELETE,
			path: format!("/api/users/{}", app.fixtures.org_b.owner.id()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "admin_unknown_user_is_not_found",
			method: Method::DELETE,
			path: format!("/api/users/{}", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "malformed_user_id_is_bad_request",
			method: Method::DELETE,
			path: "/api/users/not-a-uuid".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_can_delete_member",
			method: Method::DELETE,
			path: format!("/api/users/{}", org.viewer.id()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn owning_tenants_blocks_deletion_with_code() {
	let app = TestApp::new().await;
	let owner = &app.fixtures.org_a.owner;

	let response = app
		.delete(&format!("/api/users/{}", owner.id()), Some(owner))
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(json_body(response).await["code"], "owns_tenants");
}

#[tokio::test]
async fn user_can_delete_self_and_session_ends() {
	let app = TestApp::new().await;
	let outsider = &app.fixtures.outsider;

	let response = app
		.delete(&format!("/api/users/{}", outsider.id()), Some(outsider))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["deleted"], true);

	let response = app.get("/api/me/tenancy", Some(outsider)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleted_member_loses_membership() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.delete(&format!("/api/users/{}", org.viewer.id()), Some(&app.fixtures.admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.role_of(&org.viewer.user.id), None);
}
