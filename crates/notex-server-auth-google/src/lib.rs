// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Google OAuth 2.0 / OpenID Connect sign-in for NoteX.
//!
//! # Flow
//!
//! 1. [`GoogleOAuthClient::authorization_url`] builds the consent URL carrying
//!    a random `state`, which the server also stores in a short-lived cookie.
//! 2. Google redirects back with `code` and `state`; the server compares the
//!    state with its cookie.
//! 3. [`GoogleOAuthClient::exchange_code`] trades the code for an access token.
//! 4. [`GoogleOAuthClient::get_user_info`] reads the profile. Only a verified
//!    email is trusted for the create-or-link step.
//!
//! NoteX needs the profile once per sign-in, so no refresh token is requested.

use notex_common_secret::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Network error, timeout or TLS failure talking to Google.
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// Google answered with an OAuth error (expired code, revoked token, ...).
	#[error("Google API error: {0}")]
	GoogleError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Credentials of the NoteX OAuth application in Google Cloud Console.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	/// Must match a redirect URI registered with Google.
	pub redirect_uri: String,
	/// Must include `openid` and `email`.
	pub scopes: Vec<String>,
}

impl GoogleOAuthConfig {
	pub fn validate(&self) -> Result<(), OAuthError> {
		if self.client_id.is_empty() {
			return Err(OAuthError::InvalidConfig(
				"client_id cannot be empty".to_string(),
			));
		}
		if self.client_secret.is_blank() {
			return Err(OAuthError::InvalidConfig(
				"client_secret cannot be empty".to_string(),
			));
		}
		Url::parse(&self.redirect_uri)
			.map_err(|e| OAuthError::InvalidConfig(format!("redirect_uri: {e}")))?;
		if !self.scopes.iter().any(|s| s == "email") {
			return Err(OAuthError::InvalidConfig(
				"scopes must include 'email'".to_string(),
			));
		}
		Ok(())
	}

	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
	#[serde(deserialize_with = "deserialize_secret_string")]
	pub access_token: SecretString,
	pub token_type: String,
	pub expires_in: u64,
	#[serde(default)]
	pub scope: Option<String>,
}

fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
	D: Deserializer<'de>,
{
	String::deserialize(deserializer).map(SecretString::new)
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
	/// Google's stable account id.
	pub sub: String,
	pub email: String,
	#[serde(default)]
	pub email_verified: bool,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub given_name: Option<String>,
	#[serde(default)]
	pub picture: Option<String>,
}

impl GoogleUserInfo {
	/// Best available human name: full name, then given name.
	pub fn display_name(&self) -> Option<&str> {
		[self.name.as_deref(), self.given_name.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.find(|n| !n.is_empty())
	}
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
	error: String,
	error_description: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
	config: GoogleOAuthConfig,
	http_client: reqwest::Client,
	authorize_url: Url,
}

impl GoogleOAuthClient {
	#[tracing::instrument(skip_all, name = "GoogleOAuthClient::new")]
	pub fn new(config: GoogleOAuthConfig) -> Result<Self, OAuthError> {
		config.validate()?;

		let http_client = reqwest::Client::builder()
			.user_agent(concat!("notex-server/", env!("CARGO_PKG_VERSION")))
			.timeout(std::time::Duration::from_secs(15))
			.build()?;
		let authorize_url = Url::parse(GOOGLE_AUTHORIZE_URL)
			.map_err(|e| OAuthError::InvalidConfig(format!("authorize URL: {e}")))?;

		Ok(Self {
			config,
			http_client,
			authorize_url,
		})
	}

	/// Consent-screen URL for the authorization code flow.
	#[tracing::instrument(skip(self, state), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self, state: &str) -> String {
		let mut url = self.authorize_url.clone();
		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.redirect_uri)
			.append_pair("response_type", "code")
			.append_pair("scope", &self.config.scopes_string())
			.append_pair("state", state)
			.append_pair("access_type", "online")
			.append_pair("prompt", "select_account");
		url.to_string()
	}

	/// Exchange an authorization code for an access token.
	#[tracing::instrument(skip(self, code), name = "GoogleOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for tokens");

		let response = self
			.http_client
			.post(GOOGLE_TOKEN_URL)
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			])
			.send()
			.await?;

		let body = response.text().await?;
		parse_token_response(&body)
	}

	/// Fetch the signed-in user's profile.
	#[tracing::instrument(skip(self, access_token), name = "GoogleOAuthClient::get_user_info")]
	pub async fn get_user_info(&self, access_token: &SecretString) -> Result<GoogleUserInfo, OAuthError> {
		tracing::debug!("fetching Google user info");

		let response = self
			.http_client
			.get(GOOGLE_USERINFO_URL)
			.bearer_auth(access_token.expose())
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(OAuthError::GoogleError(format!(
				"userinfo returned {status}"
			)));
		}

		response
			.json()
			.await
			.map_err(|e| OAuthError::ParseError(format!("failed to parse user info response: {e}")))
	}
}

fn parse_token_response(body: &str) -> Result<GoogleTokenResponse, OAuthError> {
	if let Ok(error_response) = serde_json::from_str::<GoogleErrorResponse>(body) {
		if !error_response.error.is_empty() {
			let message = error_response
				.error_description
				.unwrap_or(error_response.error);
			return Err(OAuthError::GoogleError(message));
		}
	}

	serde_json::from_str(body)
		.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn config() -> GoogleOAuthConfig {
		GoogleOAuthConfig {
			client_id: "notex-client".to_string(),
			client_secret: SecretString::new("notex-client-secret".to_string()),
			redirect_uri: "https://notex.example.com/api/auth/google/callback".to_string(),
			scopes: vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			],
		}
	}

	#[test]
	fn authorization_url_contains_required_params() {
		let client = GoogleOAuthClient::new(config()).unwrap();
		let url = client.authorization_url("state-123");

		assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
		assert!(url.contains("client_id=notex-client"));
		assert!(url.contains(
			"redirect_uri=https%3A%2F%2Fnotex.example.com%2Fapi%2Fauth%2Fgoogle%2Fcallback"
		));
		assert!(url.contains("response_type=code"));
		assert!(url.contains("scope=openid+email+profile"));
		assert!(url.contains("state=state-123"));
		assert!(!url.contains("notex-client-secret"));
	}

	#[test]
	fn validate_rejects_incomplete_config() {
		let mut missing_secret = config();
		missing_secret.client_secret = SecretString::new(String::new());
		assert!(matches!(
			missing_secret.validate(),
			Err(OAuthError::InvalidConfig(_))
		));

		let mut bad_redirect = config();
		bad_redirect.redirect_uri = "not a url".to_string();
		assert!(bad_redirect.validate().is_err());

		let mut no_email = config();
		no_email.scopes = vec!["openid".to_string()];
		assert!(no_email.validate().is_err());
	}

	#[test]
	fn token_error_body_becomes_google_error() {
		let err = parse_token_response(
			r#"{"error":"invalid_grant","error_description":"Bad Request"}"#,
		)
		.unwrap_err();
		assert!(matches!(err, OAuthError::GoogleError(ref m) if m == "Bad Request"));
	}

	#[test]
	fn token_response_wraps_access_token() {
		let token = parse_token_response(
			r#"{"access_token":"ya29.secret","token_type":"Bearer","expires_in":3599,"scope":"openid email"}"#,
		)
		.unwrap();
		assert_eq!(token.access_token.expose(), "ya29.secret");
		assert!(!format!("{token:?}").contains("ya29.secret"));
	}

	#[test]
	fn garbage_token_body_is_parse_error() {
		assert!(matches!(
			parse_token_response("<html>"),
			Err(OAuthError::ParseError(_))
		));
	}

	#[test]
	fn user_info_tolerates_missing_optional_fields() {
		let user: GoogleUserInfo =
			serde_json::from_str(r#"{"sub":"1","email":"ann@x.com"}"#).unwrap();
		assert!(!user.email_verified);
		assert_eq!(user.display_name(), None);
	}

	#[test]
	fn display_name_prefers_full_name() {
		let user: GoogleUserInfo = serde_json::from_str(
			r#"{"sub":"1","email":"ann@x.com","email_verified":true,"name":"Ann Lee","given_name":"Ann"}"#,
		)
		.unwrap();
		assert_eq!(user.display_name(), Some("Ann Lee"));

		let given_only: GoogleUserInfo = serde_json::from_str(
			r#"{"sub":"1","email":"ann@x.com","name":"  ","given_name":"Ann"}"#,
		)
		.unwrap();
		assert_eq!(given_only.display_name(), Some("Ann"));
	}

	proptest! {
		#[test]
		fn state_is_always_url_encoded(state in "[ -~]{1,64}") {
			let client = GoogleOAuthClient::new(config()).unwrap();
			let url = Url::parse(&client.authorization_url(&state)).unwrap();
			let echoed = url
				.query_pairs()
				.find(|(k, _)| k == "state")
				.map(|(_, v)| v.into_owned());
			prop_assert_eq!(echoed, Some(state));
		}
	}
}
