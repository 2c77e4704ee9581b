// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared setup for notex-server integration tests.

#![allow(dead_code)]

use axum::{
	body::Body,
	http::{
		header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
		HeaderMap, Method, Request, StatusCode,
	},
	Router,
};
use notex_server::{create_app_state_with_issuer, create_router, ServerConfig};
use notex_server_config::{AuthConfigLayer, ServerConfigLayer, StorageConfigLayer};
use notex_server_db::{create_pool, run_migrations, SqlitePool};
use notex_server_storage::{testing::StubIssuer, CapabilityIssuer};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub fn test_config() -> ServerConfig {
	notex_server_config::finalize(ServerConfigLayer {
		auth: Some(AuthConfigLayer {
			session_secret: Some("test-session-secret".into()),
			federated_secret: Some("test-federated-secret".into()),
			password_hash_memory_kib: Some(1024),
			password_hash_iterations: Some(1),
			note_key_hash_memory_kib: Some(1024),
			note_key_hash_iterations: Some(1),
			..Default::default()
		}),
		storage: Some(StorageConfigLayer {
			bucket: Some("notex-test".to_string()),
			access_key_id: Some("AKIDTEST".to_string()),
			secret_access_key: Some("test-storage-secret".into()),
			..Default::default()
		}),
		..Default::default()
	})
	.unwrap()
}

pub struct TestApp {
	pub router: Router,
	pub pool: SqlitePool,
	pub config: ServerConfig,
	_dir: TempDir,
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

impl TestResponse {
	pub fn set_cookies(&self) -> Vec<String> {
		self.headers
			.get_all(SET_COOKIE)
			.iter()
			.map(|v| v.to_str().unwrap().to_string())
			.collect()
	}

	/// `name=value` of the first cookie set with this name.
	pub fn cookie_pair(&self, name: &str) -> Option<String> {
		self.set_cookies()
			.into_iter()
			.filter_map(|c| c.split(';').next().map(str::to_string))
			.find(|pair| pair.starts_with(&format!("{name}=")))
	}

	pub fn error_tag(&self) -> &str {
		self.body["error"].as_str().unwrap_or_default()
	}
}

impl TestApp {
	pub async fn new() -> Self {
		Self::with_issuer(Arc::new(StubIssuer::new())).await
	}

	pub async fn with_issuer(issuer: Arc<dyn CapabilityIssuer>) -> Self {
		Self::with_config(test_config(), issuer).await
	}

	pub async fn with_config(config: ServerConfig, issuer: Arc<dyn CapabilityIssuer>) -> Self {
		let dir = tempfile::tempdir().unwrap();
		let db_url = format!("sqlite:{}", dir.path().join("notex.db").display());
		let pool = create_pool(&db_url, 5).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let state = create_app_state_with_issuer(pool.clone(), &config, issuer).unwrap();
		Self {
			router: create_router(state),
			pool,
			config,
			_dir: dir,
		}
	}

	pub async fn send(&self, request: Request<Body>) -> TestResponse {
		let response = self.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let headers = response.headers().clone();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let body = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap_or(Value::Null)
		};
		TestResponse {
			status,
			headers,
			body,
		}
	}

	pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
		self.send(request(Method::GET, uri, None, cookie)).await
	}

	pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
		self.send(request(Method::POST, uri, Some(body), cookie)).await
	}

	pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
		self.send(request(Method::DELETE, uri, None, cookie)).await
	}

	pub async fn signup(&self, email: &str, display_name: Option<&str>) -> TestResponse {
		let mut body = json!({ "email": email, "password": PASSWORD });
		if let Some(name) = display_name {
			body["displayName"] = json!(name);
		}
		self.post("/api/auth/signup", body, None).await
	}

	/// Sign up and log in; returns the `notex_session=<jwt>` cookie pair.
	pub async fn register(&self, email: &str) -> String {
		let created = self.signup(email, None).await;
		assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
		let login = self
			.post(
				"/api/auth/login",
				json!({ "email": email, "password": PASSWORD }),
				None,
			)
			.await;
		assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
		login.cookie_pair("notex_session").unwrap()
	}

	pub async fn upload(
		&self,
		cookie: &str,
		visibility: &str,
		name: &str,
		image_key: Option<&str>,
	) -> TestResponse {
		let mut body = json!({
			"visibility": visibility,
			"name": name,
			"size": 1024,
			"contentType": "image/png",
		});
		if let Some(key) = image_key {
			body["imageKey"] = json!(key);
		}
		self.post("/api/notes", body, Some(cookie)).await
	}
}

pub fn request(method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(cookie) = cookie {
		builder = builder.header(COOKIE, cookie);
	}
	match body {
		Some(body) => builder
			.header(CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	}
}
