// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account, session and Google sign-in routes.

use axum::{
	extract::{Query, State},
	http::{header::SET_COOKIE, HeaderMap, StatusCode},
	response::{AppendHeaders, IntoResponse, Redirect},
	Json,
};
use notex_server_api::{
	AccountResponse, ErrorResponse, LoginRequest, LoginResponse, MessageResponse,
	OAuthCallbackQuery, SessionResponse, SignupRequest,
};
use notex_server_auth::{extract_cookie, Provider};
use notex_server_session::FederatedProfile;

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::ServerError,
	extract::ApiJson,
	oauth_state::{generate_state, state_matches, OAUTH_STATE_COOKIE, OAUTH_STATE_MAX_AGE_SECS},
};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// Creates an account with email and password.
#[tracing::instrument(skip(state, payload))]
pub async fn signup(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let user = state.accounts.create_account(payload.into()).await?;
	tracing::info!(user_id = %user.id, "account created");
	Ok((StatusCode::CREATED, Json(AccountResponse::from(&user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// Password login.
///
/// Unknown emails, accounts without a password and wrong passwords all get
/// the same `invalid_credentials` answer.
#[tracing::instrument(skip(state, payload))]
pub async fn login(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let signed_in = state
		.accounts
		.login(&payload.email, payload.password)
		.await?;
	tracing::info!(user_id = %signed_in.user.id, "user logged in");

	let cookie = state.cookies.set_cookie(&signed_in.token);
	Ok((
		AppendHeaders([(SET_COOKIE, cookie)]),
		Json(LoginResponse::from(&signed_in)),
	))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Clears both session cookies. Safe to call when already logged out.
#[tracing::instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
	let message = if state.cookies.has_session_cookie(&headers) {
		"logged out successfully"
	} else {
		"already logged out"
	};

	let cleared = state
		.cookies
		.clear_cookies()
		.into_iter()
		.map(|cookie| (SET_COOKIE, cookie));
	(AppendHeaders(cleared), Json(MessageResponse::new(message)))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "The authenticated caller", body = SessionResponse),
        (status = 401, description = "no_token, invalid_token or user_not_found", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
pub async fn verify_session(RequireAuth(identity): RequireAuth) -> Json<SessionResponse> {
	Json(SessionResponse::from(&identity))
}

#[utoipa::path(
    get,
    path = "/api/auth/google/login",
    responses(
        (status = 303, description = "Redirect to Google"),
        (status = 501, description = "Google sign-in is not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// Starts Google sign-in: sets the `state` cookie and redirects to Google.
#[tracing::instrument(skip(state), fields(provider = "google"))]
pub async fn google_login(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
	let Some(google) = &state.google_oauth else {
		return Err(ServerError::OAuthNotConfigured);
	};

	let oauth_state = generate_state();
	let cookie =
		state
			.cookies
			.transient_cookie(OAUTH_STATE_COOKIE, &oauth_state, OAUTH_STATE_MAX_AGE_SECS);
	let url = google.authorization_url(&oauth_state);

	Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&url)))
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from Google"),
        ("state" = Option<String>, Query, description = "State parameter for CSRF protection"),
        ("error" = Option<String>, Query, description = "Error code if authorization failed")
    ),
    responses(
        (status = 303, description = "Signed in; federated cookie set, redirect to the app root"),
        (status = 400, description = "Invalid callback", body = ErrorResponse),
        (status = 501, description = "Google sign-in is not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// Finishes Google sign-in.
///
/// Authorization codes are single-use. Never log the code or access token.
#[tracing::instrument(skip(state, query, headers), fields(provider = "google"))]
pub async fn google_callback(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, ServerError> {
	if let Some(error) = &query.error {
		return Err(ServerError::OAuth(format!(
			"Google authorization failed: {error}"
		)));
	}

	let Some(google) = &state.google_oauth else {
		return Err(ServerError::OAuthNotConfigured);
	};

	let (Some(code), Some(returned_state)) = (&query.code, &query.state) else {
		return Err(ServerError::OAuth("missing code or state".to_string()));
	};

	let expected_state = extract_cookie(&headers, OAUTH_STATE_COOKIE).unwrap_or_default();
	if !state_matches(&expected_state, returned_state) {
		return Err(ServerError::OAuth("state mismatch".to_string()));
	}

	let tokens = google.exchange_code(code).await.map_err(|e| {
		tracing::error!(error = %e, "failed to exchange Google code");
		ServerError::OAuth("failed to exchange authorization code".to_string())
	})?;

	let profile = google
		.get_user_info(&tokens.access_token)
		.await
		.map_err(|e| {
			tracing::error!(error = %e, "failed to fetch Google profile");
			ServerError::OAuth("failed to fetch user profile".to_string())
		})?;

	if !profile.email_verified {
		return Err(ServerError::OAuth("email not verified".to_string()));
	}

	let signed_in = state
		.accounts
		.link_federated(FederatedProfile {
			email: profile.email.clone(),
			display_name: profile.display_name().map(str::to_string),
			provider: Provider::Google,
		})
		.await?;
	tracing::info!(user_id = %signed_in.user.id, "Google sign-in complete");

	let session = state.cookies.set_cookie(&signed_in.token);
	let cleared_state = state.cookies.transient_cookie(OAUTH_STATE_COOKIE, "", 0);

	Ok((
		AppendHeaders([(SET_COOKIE, session), (SET_COOKIE, cleared_state)]),
		Redirect::to(&format!("{}/", state.base_url)),
	))
}
