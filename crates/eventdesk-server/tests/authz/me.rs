// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::support::{json_body, TestApp};

#[tokio::test]
async fn anonymous_tenancy_is_unauthorized() {
	let app = TestApp::new().await;

	let response = app.get("/api/me/tenancy", None).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_sees_owned_tenants_and_defaults() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let body = json_body(app.get("/api/me/tenancy", Some(&org.owner)).await).await;
	assert_eq!(body["organization_ids"], json!([org.org.id.to_string()]));
	assert_eq!(body["team_ids"], json!([org.team.id.to_string()]));
	assert_eq!(body["default_organization_id"], org.org.id.to_string());
	assert_eq!(body["default_team_id"], org.team.id.to_string());
	assert_eq!(body["event"], Value::Null);
}

#[tokio::test]
async fn member_without_team_has_no_default_team() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let body = json_body(app.get("/api/me/tenancy", Some(&org.viewer)).await).await;
	assert_eq!(body["organization_ids"], json!([org.org.id.to_string()]));
	assert_eq!(body["team_ids"], json!([]));
	assert_eq!(body["default_team_id"], Value::Null);
}

#[tokio::test]
async fn second_organization_clears_only_the_organization_default() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;

	let response = app
		.post(
			"/api/tenants",
			Some(&org.owner),
			json!({"kind": "organization", "name": "Second Org"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = json_body(app.get("/api/me/tenancy", Some(&org.owner)).await).await;
	assert_eq!(body["organization_ids"].as_array().unwrap().len(), 2);
	assert_eq!(body["default_organization_id"], Value::Null);
	assert_eq!(body["default_team_id"], org.team.id.to_string());
}

#[tokio::test]
async fn event_param_is_only_echoed_when_accessible() {
	let app = TestApp::new().await;
	let org = &app.fixtures.org_a;
	let own_event = org.event.id.to_string();
	let foreign_event = app.fixtures.org_b.event.id.to_string();

	let body = json_body(
		app.get(&format!("/api/me/tenancy?event={own_event}"), Some(&org.viewer))
			.await,
	)
	.await;
	assert_eq!(body["event"], own_event);

	let body = json_body(
		app.get(
			&format!("/api/me/tenancy?event={foreign_event}"),
			Some(&org.viewer),
		)
		.await,
	)
	.await;
	assert_eq!(body["event"], Value::Null);

	let body = json_body(
		app.get("/api/me/tenancy?event=%27%3B%20DROP", Some(&org.viewer))
			.await,
	)
	.await;
	assert_eq!(body["event"], Value::Null);
}

#[tokio::test]
async fn admin_without_tenants_cannot_reach_events_through_param() {
	let app = TestApp::new().await;
	let event = app.fixtures.org_a.event.id.to_string();

	let body = json_body(
		app.get(&format!("/api/me/tenancy?event={event}"), Some(&app.fixtures.admin))
			.await,
	)
	.await;
	assert_eq!(body["organization_ids"], json!([]));
	assert_eq!(body["event"], Value::Null);
}
