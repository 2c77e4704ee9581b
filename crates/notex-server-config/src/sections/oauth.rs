// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Federated sign-in provider configuration.

use notex_common_config::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration layer for Google OAuth (all fields optional for layering).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleOAuthConfigLayer {
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<SecretString>,
	#[serde(default)]
	pub redirect_uri: Option<String>,
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
}

impl GoogleOAuthConfigLayer {
	pub fn merge(&mut self, other: GoogleOAuthConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
	}

	/// `Ok(None)` when no client id is set; Google sign-in is then disabled.
	pub fn build(self) -> Result<Option<GoogleOAuthConfig>, ConfigError> {
		let Some(client_id) = self.client_id.filter(|s| !s.is_empty()) else {
			return Ok(None);
		};

		let client_secret = self
			.client_secret
			.filter(|s| !s.is_blank())
			.ok_or_else(|| {
				ConfigError::Validation(
					"Google OAuth client_secret is required when client_id is set".to_string(),
				)
			})?;

		let redirect_uri = self
			.redirect_uri
			.filter(|s| !s.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"Google OAuth redirect_uri is required when client_id is set".to_string(),
				)
			})?;

		let scopes = self.scopes.unwrap_or_else(|| {
			vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			]
		});

		Ok(Some(GoogleOAuthConfig {
			client_id,
			client_secret,
			redirect_uri,
			scopes,
		}))
	}
}

/// Validated Google OAuth configuration.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub redirect_uri: String,
	pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthConfigLayer {
	#[serde(default)]
	pub google: Option<GoogleOAuthConfigLayer>,
}

impl OAuthConfigLayer {
	pub fn merge(&mut self, other: OAuthConfigLayer) {
		match (self.google.as_mut(), other.google) {
			(Some(current), Some(incoming)) => current.merge(incoming),
			(None, Some(incoming)) => self.google = Some(incoming),
			_ => {}
		}
	}

	pub fn finalize(self) -> Result<OAuthConfig, ConfigError> {
		Ok(OAuthConfig {
			google: match self.google {
				Some(layer) => layer.build()?,
				None => None,
			},
		})
	}
}

#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
	pub google: Option<GoogleOAuthConfig>,
}
