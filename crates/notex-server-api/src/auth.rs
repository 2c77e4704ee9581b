// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication API types.

use chrono::{DateTime, Utc};
use notex_server_auth::{Identity, SecretString, User};
use notex_server_session::{NewAccount, SignedIn};
use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request body for creating an account.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
	pub email: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: SecretString,
	#[serde(default)]
	pub display_name: Option<String>,
}

impl From<SignupRequest> for NewAccount {
	fn from(request: SignupRequest) -> Self {
		NewAccount {
			email: request.email,
			password: request.password,
			display_name: request.display_name,
		}
	}
}

/// A newly created account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
	pub id: String,
	pub email: String,
	pub display_name: String,
	pub created_at: DateTime<Utc>,
}

impl From<&User> for AccountResponse {
	fn from(user: &User) -> Self {
		Self {
			id: user.id.to_string(),
			email: user.email.clone(),
			display_name: user.display_name.clone(),
			created_at: user.created_at,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
	pub email: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: SecretString,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
	pub id: String,
	pub email: String,
	pub display_name: String,
	/// `credentials` or `google`.
	pub provider: String,
}

impl From<&Identity> for SessionResponse {
	fn from(identity: &Identity) -> Self {
		Self {
			id: identity.user_id.to_string(),
			email: identity.email.clone(),
			display_name: identity.display_name.clone(),
			provider: identity.provider.as_str().to_string(),
		}
	}
}

/// Successful password login. The token is also set as a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	pub user: SessionResponse,
	pub token: String,
	pub expires_at: DateTime<Utc>,
}

impl From<&SignedIn> for LoginResponse {
	fn from(signed_in: &SignedIn) -> Self {
		Self {
			user: SessionResponse::from(&signed_in.user.identity()),
			token: signed_in.token.token.expose().clone(),
			expires_at: signed_in.token.expires_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageResponse {
	pub message: String,
}

impl MessageResponse {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Query parameters Google sends to the OAuth callback.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OAuthCallbackQuery {
	pub code: Option<String>,
	pub state: Option<String>,
	pub error: Option<String>,
}
