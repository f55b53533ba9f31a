// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use eventdesk_auth::{PricingPlan, TenantRole};
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp, TestUser};

#[tokio::test]
async fn test_tenant_authorization() {
	let app = TestApp::new().await;
	let org_a_id = app.fixtures.org_a.org.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_create_tenant",
			method: Method::POST,
			path: "/api/tenants".to_string(),
			user: None,
			body: Some(json!({"kind": "organization", "name": "Anon Org"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "any_user_can_create_tenant",
			method: Method::POST,
			path: "/api/tenants".to_string(),
			user: Some(app.fixtures.outsider.clone()),
			body: Some(json!({"kind": "team", "name": "Outsider Team"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "unknown_kind_is_rejected",
			method: Method::POST,
			path: "/api/tenants".to_string(),
			user: Some(app.fixtures.outsider.clone()),
			body: Some(json!({"kind": "guild", "name": "Guild"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "owner_can_rename",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"name": "Renamed A"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "editor_cannot_rename",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: Some(json!({"name": "Editor Rename"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_owner_cannot_rename",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_b.owner.clone()),
			body: Some(json!({"name": "Hijacked"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_can_rename",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"name": "Admin Rename"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_empty_patch_is_forbidden",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.outsider.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "viewer_empty_patch_reads_tenant",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_a.viewer.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "owner_cannot_change_pricing_plan",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"pricing_plan": "enterprise"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin_rejects_unknown_plan",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"pricing_plan": "platinum"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "transfer_to_unknown_user_is_not_found",
			method: Method::PATCH,
			path: format!("/api/tenants/{org_a_id}"),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"owner": uuid::Uuid::new_v4().to_string()})),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "malformed_tenant_id_is_bad_request",
			method: Method::PATCH,
			path: "/api/tenants/not-a-uuid".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"name": "Nope"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_tenant_is_not_found",
			method: Method::PATCH,
			path: format!("/api/tenants/{}", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"name": "Nope"})),
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn created_tenant_is_owned_by_caller() {
	let app = TestApp::new().await;
	let outsider = &app.fixtures.outsider;

	let response = app
		.post(
			"/api/tenants",
			Some(outsider),
			json!({"kind": "organization", "name": "  Fresh Org  "}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = json_body(response).await;
	assert_eq!(body["owner"], outsider.id());
	assert_eq!(body["kind"], "organization");
	assert_eq!(body["name"], "Fresh Org");
	assert_eq!(body["pricing_plan"], "free");
	assert_eq!(body["members"], json!([]));
}

#[tokio::test]
async fn rejected_patch_writes_nothing() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.patch(
			&format!("/api/tenants/{}", org.org.id),
			Some(&org.owner),
			json!({"name": "Should Not Stick", "pricing_plan": "pro"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.name, org.org.name);
	assert_eq!(stored.pricing_plan, PricingPlan::Free);
}

#[tokio::test]
async fn admin_can_change_pricing_plan() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.patch(
			&format!("/api/tenants/{}", org.org.id),
			Some(&app.fixtures.admin),
			json!({"pricing_plan": "pro"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["pricing_plan"], "pro");
	assert_eq!(app.reload_tenant(&org.org).await.pricing_plan, PricingPlan::Pro);
}

#[tokio::test]
async fn ownership_transfer_demotes_previous_owner_to_editor() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.patch(
			&format!("/api/tenants/{}", org.org.id),
			Some(&org.owner),
			json!({"owner": org.editor.id()}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["owner"], org.editor.id());

	let stored = app.reload_tenant(&org.org).await;
	assert_eq!(stored.role_of(&org.editor.user.id), Some(TenantRole::Owner));
	assert_eq!(stored.role_of(&org.owner.user.id), Some(TenantRole::Editor));

	let response = app
		.patch(
			&format!("/api/tenants/{}", org.org.id),
			Some(&org.owner),
			json!({"name": "Former Owner Rename"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tenant_delete_authorization() {
	let app = TestApp::new().await;
	let org_a = format!("/api/tenants/{}", app.fixtures.org_a.org.id);

	let cases = vec![
		AuthzCase {
			name: "anonymous_cannot_delete_tenant",
			method: Method::DELETE,
			path: org_a.clone(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "editor_cannot_delete_tenant",
			method: Method::DELETE,
			path: org_a.clone(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_owner_cannot_delete_tenant",
			method: Method::DELETE,
			path: org_a.clone(),
			user: Some(app.fixtures.org_b.owner.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown_tenant_delete_is_not_found",
			method: Method::DELETE,
			path: format!("/api/tenants/{}", uuid::Uuid::new_v4()),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_can_delete_tenant",
			method: Method::DELETE,
			path: format!("/api/tenants/{}", app.fixtures.org_b.team.id),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn owner_deletes_tenants_then_can_delete_account() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let owner = &org.owner;
	let account = format!("/api/users/{}", owner.id());

	let response = app.delete(&account, Some(owner)).await;
	assert_eq!(response.status(), StatusCode::CONFLICT);

	for tenant in [&org.org, &org.team] {
		let response = app
			.delete(&format!("/api/tenants/{}", tenant.id), Some(owner))
			.await;
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(json_body(response).await["deleted"], true);
	}

	let response = app
		.get(&format!("/api/events/{}", org.event.id), Some(&app.fixtures.admin))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = app.delete(&account, Some(owner)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["deleted"], true);
}

#[tokio::test]
async fn test_member_removal_authorization() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let member = |user: &TestUser| {
		format!("/api/tenants/{}/members/{}", org.org.id, user.id())
	};

	let cases = vec![
		AuthzCase {
			name: "editor_cannot_remove_viewer",
			method: Method::DELETE,
			path: member(&org.viewer),
			user: Some(org.editor.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider_cannot_remove_viewer",
			method: Method::DELETE,
			path: member(&org.viewer),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_cannot_remove_self",
			method: Method::DELETE,
			path: member(&org.owner),
			user: Some(org.owner.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "viewer_can_leave",
			method: Method::DELETE,
			path: member(&org.viewer),
			user: Some(org.viewer.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "removing_non_member_is_not_found",
			method: Method::DELETE,
			path: member(&org.viewer),
			user: Some(org.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "owner_can_remove_editor",
			method: Method::DELETE,
			path: member(&org.editor),
			user: Some(org.owner.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;

	let stored = app.reload_tenant(&org.org).await;
	assert!(stored.members.is_empty());
	assert_eq!(stored.role_of(&org.owner.user.id), Some(TenantRole::Owner));
}
