// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for account and session routes.
//!
//! Tests cover:
//! - Signup validation and email uniqueness
//! - Password login and uniform credential failures
//! - Session verification reasons and precedence between token kinds
//! - Logout idempotence and cookie clearing
//! - Google sign-in when unconfigured

mod support;

use axum::{
	body::Body,
	http::{
		header::{AUTHORIZATION, CONTENT_TYPE},
		Method, Request, StatusCode,
	},
};
use notex_server_auth::{Provider, SessionTokens, UserId};
use notex_server_config::GoogleOAuthConfig;
use notex_server_storage::testing::StubIssuer;
use serde_json::json;
use std::sync::Arc;
use support::{request, test_config, TestApp, PASSWORD};

fn tokens(app: &TestApp) -> SessionTokens {
	SessionTokens::new(
		&app.config.auth.session_secret,
		&app.config.auth.federated_secret,
		chrono::Duration::hours(1),
	)
}

fn federated_cookie(app: &TestApp, email: &str) -> String {
	let issued = tokens(app)
		.issue_federated(email, None, Provider::Google)
		.unwrap();
	format!("notex_federated_session={}", issued.token.expose())
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn signup_returns_account() {
	let app = TestApp::new().await;
	let response = app.signup("bob@x.com", None).await;

	assert_eq!(response.status, StatusCode::CREATED);
	assert_eq!(response.body["email"], "bob@x.com");
	assert_eq!(response.body["displayName"], "bob");
	assert!(response.body["id"].as_str().unwrap().parse::<UserId>().is_ok());
	assert!(response.body["createdAt"].is_string());
	assert!(response.body.get("passwordHash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
	let app = TestApp::new().await;
	assert_eq!(app.signup("bob@x.com", None).await.status, StatusCode::CREATED);

	let again = app.signup("bob@x.com", Some("Bobby")).await;
	assert_eq!(again.status, StatusCode::CONFLICT);
	assert_eq!(again.error_tag(), "conflict");
}

#[tokio::test]
async fn signup_reports_every_invalid_field() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/auth/signup",
			json!({ "email": "not-an-email", "password": "short", "displayName": "   " }),
			None,
		)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.error_tag(), "validation_failed");
	let fields: Vec<&str> = response.body["fields"]
		.as_array()
		.unwrap()
		.iter()
		.map(|f| f["field"].as_str().unwrap())
		.collect();
	assert!(fields.contains(&"email"));
	assert!(fields.contains(&"password"));
	assert!(fields.contains(&"displayName"));
}

#[tokio::test]
async fn display_name_with_separator_is_rejected() {
	let app = TestApp::new().await;
	let response = app.signup("bob@x.com", Some("ann/public")).await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.body["fields"][0]["field"], "displayName");
}

#[tokio::test]
async fn signup_without_password_names_the_field() {
	let app = TestApp::new().await;
	let response = app
		.post("/api/auth/signup", json!({ "email": "bob@x.com" }), None)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.error_tag(), "validation_failed");
	assert_eq!(response.body["fields"][0]["field"], "password");
}

#[tokio::test]
async fn unparseable_signup_body_is_validation_failure() {
	let app = TestApp::new().await;
	let req = Request::builder()
		.method(Method::POST)
		.uri("/api/auth/signup")
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from("{not json"))
		.unwrap();
	let response = app.send(req).await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.error_tag(), "validation_failed");
	assert_eq!(response.body["fields"][0]["field"], "body");

	let untyped = app
		.send(request(Method::POST, "/api/auth/signup", None, None))
		.await;
	assert_eq!(untyped.status, StatusCode::BAD_REQUEST);
	assert_eq!(untyped.error_tag(), "validation_failed");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_sets_session_cookie() {
	let app = TestApp::new().await;
	app.signup("bob@x.com", None).await;

	let response = app
		.post(
			"/api/auth/login",
			json!({ "email": "bob@x.com", "password": PASSWORD }),
			None,
		)
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["user"]["email"], "bob@x.com");
	assert_eq!(response.body["user"]["provider"], "credentials");

	let cookie = &response.set_cookies()[0];
	assert!(cookie.starts_with("notex_session="));
	assert!(cookie.contains("Max-Age=604800"));
	assert!(cookie.contains("HttpOnly"));
	assert!(cookie.contains("SameSite=Lax"));
	assert!(!cookie.contains("Secure"));

	let token = response.body["token"].as_str().unwrap();
	assert_eq!(
		response.cookie_pair("notex_session").unwrap(),
		format!("notex_session={token}")
	);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
	let app = TestApp::new().await;
	app.signup("bob@x.com", None).await;

	let wrong = app
		.post(
			"/api/auth/login",
			json!({ "email": "bob@x.com", "password": "wrong-password" }),
			None,
		)
		.await;
	let unknown = app
		.post(
			"/api/auth/login",
			json!({ "email": "nobody@x.com", "password": PASSWORD }),
			None,
		)
		.await;

	for response in [&wrong, &unknown] {
		assert_eq!(response.status, StatusCode::UNAUTHORIZED);
		assert_eq!(response.error_tag(), "invalid_credentials");
		assert!(response.set_cookies().is_empty());
	}
	assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
async fn login_with_wrong_field_type_is_validation_failure() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/auth/login",
			json!({ "email": 5, "password": PASSWORD }),
			None,
		)
		.await;

	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.error_tag(), "validation_failed");
	assert_eq!(response.body["fields"][0]["field"], "email");
	assert!(response.set_cookies().is_empty());
}

// ============================================================================
// Session verification
// ============================================================================

#[tokio::test]
async fn session_without_token_is_no_token() {
	let app = TestApp::new().await;
	let response = app.get("/api/auth/session", None).await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
	assert_eq!(response.error_tag(), "no_token");
}

#[tokio::test]
async fn garbage_token_is_invalid_token() {
	let app = TestApp::new().await;
	let response = app
		.get("/api/auth/session", Some("notex_session=not.a.jwt"))
		.await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
	assert_eq!(response.error_tag(), "invalid_token");
}

#[tokio::test]
async fn valid_token_for_missing_user_is_user_not_found() {
	let app = TestApp::new().await;
	let issued = tokens(&app)
		.issue_self_issued(UserId::generate(), "ghost@x.com")
		.unwrap();
	let cookie = format!("notex_session={}", issued.token.expose());

	let response = app.get("/api/auth/session", Some(&cookie)).await;
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
	assert_eq!(response.error_tag(), "user_not_found");
}

#[tokio::test]
async fn session_is_stable_across_calls() {
	let app = TestApp::new().await;
	let cookie = app.register("bob@x.com").await;

	let first = app.get("/api/auth/session", Some(&cookie)).await;
	let second = app.get("/api/auth/session", Some(&cookie)).await;

	assert_eq!(first.status, StatusCode::OK);
	assert_eq!(first.body, second.body);
	assert_eq!(first.body["displayName"], "bob");
}

#[tokio::test]
async fn bearer_token_is_accepted() {
	let app = TestApp::new().await;
	let cookie = app.register("bob@x.com").await;
	let token = cookie.trim_start_matches("notex_session=");

	let mut req = request(Method::GET, "/api/auth/session", None, None);
	req.headers_mut()
		.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
	let response = app.send(req).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["email"], "bob@x.com");
}

#[tokio::test]
async fn invalid_bearer_falls_back_to_session_cookie() {
	let app = TestApp::new().await;
	let cookie = app.register("bob@x.com").await;

	let mut req = request(Method::GET, "/api/auth/session", None, Some(&cookie));
	req.headers_mut()
		.insert(AUTHORIZATION, "Bearer not.a.jwt".parse().unwrap());
	let response = app.send(req).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["email"], "bob@x.com");
}

#[tokio::test]
async fn federated_token_resolves_existing_account() {
	let app = TestApp::new().await;
	app.signup("bob@x.com", None).await;

	let cookie = federated_cookie(&app, "bob@x.com");
	let response = app.get("/api/auth/session", Some(&cookie)).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["email"], "bob@x.com");
}

#[tokio::test]
async fn federated_token_wins_by_default() {
	let app = TestApp::new().await;
	let bob = app.register("bob@x.com").await;
	app.signup("ann@x.com", None).await;
	let ann = federated_cookie(&app, "ann@x.com");

	let both = format!("{bob}; {ann}");
	let response = app.get("/api/auth/session", Some(&both)).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["email"], "ann@x.com");
}

#[tokio::test]
async fn invalid_federated_token_falls_back_to_session() {
	let app = TestApp::new().await;
	let bob = app.register("bob@x.com").await;

	let both = format!("{bob}; notex_federated_session=forged");
	let response = app.get("/api/auth/session", Some(&both)).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["email"], "bob@x.com");
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_clears_both_cookies() {
	let app = TestApp::new().await;
	let cookie = app.register("bob@x.com").await;

	let response = app
		.send(request(Method::POST, "/api/auth/logout", None, Some(&cookie)))
		.await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["message"], "logged out successfully");

	let cleared = response.set_cookies();
	assert_eq!(cleared.len(), 2);
	assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
	assert!(cleared.iter().any(|c| c.starts_with("notex_session=;")));
	assert!(cleared
		.iter()
		.any(|c| c.starts_with("notex_federated_session=;")));
}

#[tokio::test]
async fn logout_without_session_is_idempotent() {
	let app = TestApp::new().await;
	for _ in 0..2 {
		let response = app
			.send(request(Method::POST, "/api/auth/logout", None, None))
			.await;
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.body["message"], "already logged out");
	}
}

// ============================================================================
// Google sign-in
// ============================================================================

#[tokio::test]
async fn google_routes_without_config_return_501() {
	let app = TestApp::new().await;
	for uri in [
		"/api/auth/google/login",
		"/api/auth/google/callback?code=abc&state=xyz",
	] {
		let response = app.get(uri, None).await;
		assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED, "{uri}");
		assert_eq!(response.error_tag(), "oauth_not_configured");
	}
}

#[tokio::test]
async fn google_callback_reports_provider_error() {
	let app = TestApp::new().await;
	let response = app
		.get("/api/auth/google/callback?error=access_denied", None)
		.await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.error_tag(), "oauth_failed");
}

async fn app_with_google() -> TestApp {
	let mut config = test_config();
	config.oauth.google = Some(GoogleOAuthConfig {
		client_id: "notex-client".to_string(),
		client_secret: "notex-client-secret".into(),
		redirect_uri: "http://localhost:8080/api/auth/google/callback".to_string(),
		scopes: vec![
			"openid".to_string(),
			"email".to_string(),
			"profile".to_string(),
		],
	});
	TestApp::with_config(config, Arc::new(StubIssuer::new())).await
}

#[tokio::test]
async fn google_login_redirects_with_state_cookie() {
	let app = app_with_google().await;
	let response = app.get("/api/auth/google/login", None).await;

	assert_eq!(response.status, StatusCode::SEE_OTHER);
	let location = response.headers["location"].to_str().unwrap();
	assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));

	let state_cookie = response.cookie_pair("notex_oauth_state").unwrap();
	let state = state_cookie.trim_start_matches("notex_oauth_state=");
	assert!(location.contains(&format!("state={state}")));
	assert!(response.set_cookies()[0].contains("Max-Age=600"));
}

#[tokio::test]
async fn google_callback_rejects_state_mismatch() {
	let app = app_with_google().await;

	let missing_cookie = app
		.get("/api/auth/google/callback?code=abc&state=xyz", None)
		.await;
	assert_eq!(missing_cookie.status, StatusCode::BAD_REQUEST);
	assert_eq!(missing_cookie.error_tag(), "oauth_failed");

	let mismatched = app
		.get(
			"/api/auth/google/callback?code=abc&state=xyz",
			Some("notex_oauth_state=abc"),
		)
		.await;
	assert_eq!(mismatched.status, StatusCode::BAD_REQUEST);
	assert_eq!(mismatched.body["message"], "state mismatch");
}

#[tokio::test]
async fn google_callback_requires_code() {
	let app = app_with_google().await;
	let response = app
		.get("/api/auth/google/callback?state=xyz", Some("notex_oauth_state=xyz"))
		.await;
	assert_eq!(response.status, StatusCode::BAD_REQUEST);
	assert_eq!(response.body["message"], "missing code or state");
}
