// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::Duration;
use eventdesk_auth::{
	generate_token, hash_token, Event, GlobalRole, Invitation, Session, Tenant, TenantKind,
	TenantRole, User,
};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

use eventdesk_server::{bootstrap, create_router, AppState, ServerConfig};

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub session_token: String,
	cookie_name: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("cookie"),
			HeaderValue::from_str(&format!("{}={}", self.cookie_name, self.session_token)).unwrap(),
		)
	}

	pub fn id(&self) -> String {
		self.user.id.to_string()
	}
}

/// An organization with an owner, an editor and a viewer, plus a team
/// owned by the same owner and one event in the organization.
#[derive(Clone)]
pub struct OrgFixture {
	pub org: Tenant,
	pub team: Tenant,
	pub owner: TestUser,
	pub editor: TestUser,
	pub viewer: TestUser,
	pub event: Event,
}

#[derive(Clone)]
pub struct Fixtures {
	pub org_a: OrgFixture,
	pub org_b: OrgFixture,
	pub admin: TestUser,
	/// Signed in, belongs to no tenant.
	pub outsider: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");

		let mut config = ServerConfig::default();
		config.database.url = format!("sqlite:{}?mode=rwc", db_path.display());
		config.http.base_url = "http://eventdesk.test".to_string();

		let state = bootstrap(&config).await.unwrap();
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Signs in a fresh user with no tenants.
	pub async fn create_user(&self, email: &str) -> TestUser {
		create_test_user(&self.state, email, None).await
	}

	/// Creates an invitation through the workflow and returns its token.
	pub async fn invite(&self, tenant: &Tenant, inviter: &TestUser, email: &str, role: &str) -> String {
		self
			.state
			.invitation_workflow()
			.create(Some(&inviter.user), &tenant.id, email, Some(role))
			.await
			.unwrap()
			.token
	}

	/// Stores an invitation whose expiry is already in the past.
	pub async fn expired_invitation(&self, tenant: &Tenant, inviter: &TestUser, email: &str) -> String {
		let token = generate_token();
		let invitation = Invitation::new(
			tenant.id,
			email,
			TenantRole::Viewer,
			inviter.user.id,
			hash_token(&token),
			-1,
		);
		self
			.state
			.invitation_repo
			.create_invitation(&invitation)
			.await
			.unwrap();
		token
	}

	pub async fn reload_tenant(&self, tenant: &Tenant) -> Tenant {
		self
			.state
			.tenant_repo
			.get_tenant(&tenant.id)
			.await
			.unwrap()
			.unwrap()
	}
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let admin = create_test_user(state, "admin@eventdesk.test", Some(GlobalRole::Admin)).await;
	let outsider = create_test_user(state, "outsider@eventdesk.test", None).await;
	let org_a = create_org_fixture(state, "a").await;
	let org_b = create_org_fixture(state, "b").await;

	Fixtures {
		org_a,
		org_b,
		admin,
		outsider,
	}
}

async fn create_org_fixture(state: &AppState, slug: &str) -> OrgFixture {
	let owner = create_test_user(state, &format!("owner@{slug}.test"), None).await;
	let editor = create_test_user(state, &format!("editor@{slug}.test"), None).await;
	let viewer = create_test_user(state, &format!("viewer@{slug}.test"), None).await;

	let org = Tenant::new(
		TenantKind::Organization,
		format!("Organization {}", slug.to_uppercase()),
		owner.user.id,
	);
	state.tenant_repo.create_tenant(&org).await.unwrap();
	let team = Tenant::new(
		TenantKind::Team,
		format!("Team {}", slug.to_uppercase()),
		owner.user.id,
	);
	state.tenant_repo.create_tenant(&team).await.unwrap();

	state
		.tenant_repo
		.upsert_member(&org.id, &editor.user.id, TenantRole::Editor)
		.await
		.unwrap();
	state
		.tenant_repo
		.upsert_member(&org.id, &viewer.user.id, TenantRole::Viewer)
		.await
		.unwrap();

	let event = Event::new(org.id, format!("Launch {slug}"));
	state.event_repo.create_event(&event).await.unwrap();

	OrgFixture {
		org,
		team,
		owner,
		editor,
		viewer,
		event,
	}
}

async fn create_test_user(state: &AppState, email: &str, role: Option<GlobalRole>) -> TestUser {
	let mut user = User::new(email, email.split('@').next().unwrap_or(email));
	if let Some(role) = role {
		user = user.with_role(role);
	}
	state.user_repo.create_user(&user).await.unwrap();

	let token = generate_token();
	let session = Session::new(user.id, hash_token(&token), Duration::days(1));
	state.session_repo.create_session(&session).await.unwrap();

	TestUser {
		user,
		session_token: token,
		cookie_name: state.config.auth.session_cookie_name.clone(),
	}
}
