// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

fn event_ids(body: &serde_json::Value) -> Vec<String> {
	let mut ids: Vec<String> = body["events"]
		.as_array()
		.unwrap()
		.iter()
		.map(|e| e["id"].as_str().unwrap().to_string())
		.collect();
	ids.sort();
	ids
}

#[tokio::test]
async fn test_event_authorization() {
	let app = TestApp::new().await;
	let org_a_id = app.fixtures.org_a.org.id.to_string();
	let event_a = format!("/api/events/{}", app.fixtures.org_a.event.id);

	let cases = vec![
		AuthzCase {
			name: "viewer_can_read_own_event",
			method: Method::GET,
			path: event_a.clone(),
			user: Some(app.fixtures.org_a.viewer.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_org_event_is_not_found",
			method: Method::GET,
			path: event_a.clone(),
			user: Some(app.fixtures.org_b.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "outsider_event_is_not_found",
			method: Method::GET,
			path: event_a.clone(),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "admin_can_read_any_event",
			method: Method::GET,
			path: event_a.clone(),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous_cannot_read_event",
			method: Method::GET,
			path: event_a,
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "malformed_event_id_is_rejected",
			method: Method::GET,
			path: "/api/events/not-a-uuid".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "anonymous_cannot_list_events",
			method: Method::GET,
			path: "/api/events".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "editor_can_create_event",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: Some(json!({"name": "Editor Event", "tenant_id": org_a_id})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "owner_can_create_event",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_a.owner.clone()),
			body: Some(json!({"name": "Owner Event", "tenant_id": org_a_id})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "admin_can_create_event_anywhere",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"name": "Admin Event", "tenant_id": org_a_id})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "viewer_cannot_create_event",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_a.viewer.clone()),
			body: Some(json!({"name": "Viewer Event", "tenant_id": org_a_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_org_cannot_create_event",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_b.owner.clone()),
			body: Some(json!({"name": "Cross Event", "tenant_id": org_a_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "blank_name_is_rejected",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: Some(json!({"name": "   ", "tenant_id": org_a_id})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "malformed_tenant_id_is_rejected",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.org_a.editor.clone()),
			body: Some(json!({"name": "Event", "tenant_id": "nope"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_tenant_is_not_found",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({"name": "Event", "tenant_id": uuid::Uuid::new_v4().to_string()})),
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn listing_is_scoped_to_caller_tenants() {
	let app = TestApp::new().await;
	let event_a = app.fixtures.org_a.event.id.to_string();
	let event_b = app.fixtures.org_b.event.id.to_string();

	let viewer_body = json_body(app.get("/api/events", Some(&app.fixtures.org_a.viewer)).await).await;
	assert_eq!(event_ids(&viewer_body), vec![event_a.clone()]);

	let owner_body = json_body(app.get("/api/events", Some(&app.fixtures.org_b.owner)).await).await;
	assert_eq!(event_ids(&owner_body), vec![event_b.clone()]);

	let mut both = vec![event_a, event_b];
	both.sort();
	let admin_body = json_body(app.get("/api/events", Some(&app.fixtures.admin)).await).await;
	assert_eq!(event_ids(&admin_body), both);
}

#[tokio::test]
async fn caller_without_tenants_sees_empty_list() {
	let app = TestApp::new().await;

	let response = app.get("/api/events", Some(&app.fixtures.outsider)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["events"], json!([]));
}

#[tokio::test]
async fn single_tenant_caller_gets_default_tenant() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.post(
			"/api/events",
			Some(&org.editor),
			json!({"name": "Defaulted", "starts_at": "2026-03-01T18:00:00Z"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = json_body(response).await;
	assert_eq!(body["tenant_id"], org.org.id.to_string());
	assert_eq!(body["status"], "planning");
	assert_eq!(body["starts_at"], "2026-03-01T18:00:00Z");
}

#[tokio::test]
async fn multi_tenant_caller_must_name_tenant() {
	let app = TestApp::new().await;

	let response = app
		.post(
			"/api/events",
			Some(&app.fixtures.org_a.owner),
			json!({"name": "Ambiguous"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json_body(response).await["code"], "tenant_required");

	let response = app
		.post(
			"/api/events",
			Some(&app.fixtures.outsider),
			json!({"name": "Homeless"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_read_returns_tenant_and_name() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.get(&format!("/api/events/{}", org.event.id), Some(&org.editor))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["id"], org.event.id.to_string());
	assert_eq!(body["tenant_id"], org.org.id.to_string());
	assert_eq!(body["name"], org.event.name);
}
