// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;
use std::time::Duration;

use axum::{
	middleware,
	routing::{delete, get, post},
	Router,
};
use notex_server_auth::{AuthError, CookieSettings, SecretHasher, SessionTokens};
use notex_server_auth_google::{GoogleOAuthClient, GoogleOAuthConfig, OAuthError};
use notex_server_config::ServerConfig;
use notex_server_db::{AccessEventRepository, NoteRepository, SqlitePool, UserRepository};
use notex_server_notes::NoteService;
use notex_server_session::{AccountService, SessionResolver};
use notex_server_storage::{CapabilityIssuer, S3Presigner, S3PresignerConfig, StorageError};

use crate::{auth_middleware::auth_layer, routes};

/// Shared state handed to every handler. Everything in it is cheap to clone.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub accounts: AccountService,
	pub resolver: SessionResolver,
	pub notes: NoteService,
	pub cookies: CookieSettings,
	pub google_oauth: Option<Arc<GoogleOAuthClient>>,
	pub base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("auth setup failed: {0}")]
	Auth(#[from] AuthError),

	#[error("storage setup failed: {0}")]
	Storage(#[from] StorageError),

	#[error("Google OAuth setup failed: {0}")]
	OAuth(#[from] OAuthError),
}

/// Build state with the S3 presigner described by `config.storage`.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, StartupError> {
	let storage = &config.storage;
	let presigner = S3Presigner::new(S3PresignerConfig {
		bucket: storage.bucket.clone(),
		region: storage.region.clone(),
		endpoint: storage.endpoint.clone(),
		force_path_style: storage.force_path_style,
		access_key_id: storage.access_key_id.clone(),
		secret_access_key: storage.secret_access_key.clone(),
	})?;
	create_app_state_with_issuer(pool, config, Arc::new(presigner))
}

/// Build state around any capability issuer.
pub fn create_app_state_with_issuer(
	pool: SqlitePool,
	config: &ServerConfig,
	issuer: Arc<dyn CapabilityIssuer>,
) -> Result<AppState, StartupError> {
	let auth = &config.auth;

	let users = Arc::new(UserRepository::new(pool.clone()));
	let notes = Arc::new(NoteRepository::new(pool.clone()));
	let access_events = Arc::new(AccessEventRepository::new(pool.clone()));

	let tokens = SessionTokens::new(
		&auth.session_secret,
		&auth.federated_secret,
		chrono::Duration::seconds(auth.session_ttl_secs),
	);
	let accounts = AccountService::new(
		users.clone(),
		SecretHasher::new(auth.password_hash)?,
		tokens.clone(),
	);
	let resolver = SessionResolver::new(users.clone(), tokens, auth.credential_precedence);
	let notes = NoteService::new(
		notes,
		users,
		access_events,
		issuer,
		SecretHasher::new(auth.note_key_hash)?,
		Duration::from_secs(config.storage.capability_ttl_secs),
	);

	let google_oauth = match &config.oauth.google {
		Some(google) => {
			let client = GoogleOAuthClient::new(GoogleOAuthConfig {
				client_id: google.client_id.clone(),
				client_secret: google.client_secret.clone(),
				redirect_uri: google.redirect_uri.clone(),
				scopes: google.scopes.clone(),
			})?;
			tracing::info!("Google sign-in enabled");
			Some(Arc::new(client))
		}
		None => None,
	};

	Ok(AppState {
		pool,
		accounts,
		resolver,
		notes,
		cookies: auth.cookie_settings(),
		google_oauth,
		base_url: config.http.base_url.clone(),
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::health::openapi_json))
		// Accounts and sessions
		.route("/api/auth/signup", post(routes::auth::signup))
		.route("/api/auth/login", post(routes::auth::login))
		.route("/api/auth/logout", post(routes::auth::logout))
		.route("/api/auth/session", get(routes::auth::verify_session))
		.route("/api/auth/google/login", get(routes::auth::google_login))
		.route("/api/auth/google/callback", get(routes::auth::google_callback))
		// Notes
		.route("/api/notes", post(routes::notes::upload_note))
		.route("/api/notes/public", get(routes::notes::public_feed))
		.route("/api/notes/mine", get(routes::notes::list_mine))
		.route("/api/notes/dashboard", get(routes::notes::dashboard))
		.route("/api/notes/{id}", delete(routes::notes::delete_note))
		.route("/api/notes/{id}/access", post(routes::notes::access_note))
		.layer(middleware::from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}
