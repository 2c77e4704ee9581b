// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod support;

use axum::http::StatusCode;
use support::TestApp;

#[tokio::test]
async fn health_reports_database() {
	let app = TestApp::new().await;
	let response = app.get("/health", None).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["status"], "ok");
	assert_eq!(response.body["database"], "ok");
}

#[tokio::test]
async fn health_reports_closed_database() {
	let app = TestApp::new().await;
	app.pool.close().await;
	let response = app.get("/health", None).await;
	assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(response.body["database"], "error");
}

#[tokio::test]
async fn openapi_document_is_served() {
	let app = TestApp::new().await;
	let response = app.get("/api/openapi.json", None).await;
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body["info"]["title"], "NoteX Server API");
	assert!(response.body["paths"]["/api/notes/{id}/access"].is_object());
}
