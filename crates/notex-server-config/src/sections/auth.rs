// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration: signing secrets, token lifetime, hash costs,
//! credential precedence and cookie names.

use notex_common_config::SecretString;
use notex_server_auth::cookie::{DEFAULT_FEDERATED_COOKIE, DEFAULT_SESSION_COOKIE};
use notex_server_auth::token::DEFAULT_SESSION_TTL_SECS;
use notex_server_auth::{CookieSettings, CredentialPrecedence, HashCost};
use serde::Deserialize;

use crate::error::ConfigError;

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Deployment environment name; `production` turns on secure cookies.
	pub environment: String,
	/// HS256 key for tokens minted by password login.
	pub session_secret: SecretString,
	/// HS256 key shared with the federated sign-in flow.
	pub federated_secret: SecretString,
	pub session_ttl_secs: i64,
	pub password_hash: HashCost,
	pub note_key_hash: HashCost,
	pub credential_precedence: CredentialPrecedence,
	pub session_cookie: String,
	pub federated_cookie: String,
	pub secure_cookies: bool,
}

impl AuthConfig {
	/// Development defaults around the two required secrets.
	pub fn new(session_secret: SecretString, federated_secret: SecretString) -> Self {
		Self {
			environment: "development".to_string(),
			session_secret,
			federated_secret,
			session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
			password_hash: HashCost::default(),
			note_key_hash: HashCost::default(),
			credential_precedence: CredentialPrecedence::default(),
			session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
			federated_cookie: DEFAULT_FEDERATED_COOKIE.to_string(),
			secure_cookies: false,
		}
	}

	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}

	pub fn cookie_settings(&self) -> CookieSettings {
		CookieSettings {
			session_cookie: self.session_cookie.clone(),
			federated_cookie: self.federated_cookie.clone(),
			secure: self.secure_cookies,
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub session_secret: Option<SecretString>,
	#[serde(default)]
	pub federated_secret: Option<SecretString>,
	#[serde(default)]
	pub session_ttl_secs: Option<i64>,
	#[serde(default)]
	pub password_hash_memory_kib: Option<u32>,
	#[serde(default)]
	pub password_hash_iterations: Option<u32>,
	#[serde(default)]
	pub note_key_hash_memory_kib: Option<u32>,
	#[serde(default)]
	pub note_key_hash_iterations: Option<u32>,
	#[serde(default)]
	pub credential_precedence: Option<CredentialPrecedence>,
	#[serde(default)]
	pub session_cookie: Option<String>,
	#[serde(default)]
	pub federated_cookie: Option<String>,
	#[serde(default)]
	pub secure_cookies: Option<bool>,
}

macro_rules! take_some {
	($self:ident, $other:ident, $($field:ident),+ $(,)?) => {
		$(
			if $other.$field.is_some() {
				$self.$field = $other.$field;
			}
		)+
	};
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		take_some!(
			self,
			other,
			environment,
			session_secret,
			federated_secret,
			session_ttl_secs,
			password_hash_memory_kib,
			password_hash_iterations,
			note_key_hash_memory_kib,
			note_key_hash_iterations,
			credential_precedence,
			session_cookie,
			federated_cookie,
			secure_cookies,
		);
	}

	pub fn finalize(self) -> Result<AuthConfig, ConfigError> {
		let session_secret = require_secret(
			self.session_secret,
			"auth.session_secret",
			"NOTEX_SERVER_AUTH_SESSION_SECRET",
		)?;
		let federated_secret = require_secret(
			self.federated_secret,
			"auth.federated_secret",
			"NOTEX_SERVER_AUTH_FEDERATED_SECRET",
		)?;

		let defaults = HashCost::default();
		let mut config = AuthConfig::new(session_secret, federated_secret);

		if let Some(environment) = self.environment {
			config.environment = environment;
		}
		config.session_ttl_secs = self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS);
		config.password_hash = HashCost::new(
			self
				.password_hash_memory_kib
				.unwrap_or(defaults.memory_kib),
			self
				.password_hash_iterations
				.unwrap_or(defaults.iterations),
		);
		config.note_key_hash = HashCost::new(
			self
				.note_key_hash_memory_kib
				.unwrap_or(defaults.memory_kib),
			self
				.note_key_hash_iterations
				.unwrap_or(defaults.iterations),
		);
		config.credential_precedence = self.credential_precedence.unwrap_or_default();
		if let Some(name) = self.session_cookie {
			config.session_cookie = name;
		}
		if let Some(name) = self.federated_cookie {
			config.federated_cookie = name;
		}
		config.secure_cookies = self
			.secure_cookies
			.unwrap_or_else(|| config.is_production());

		validate(&config)?;
		Ok(config)
	}
}

fn require_secret(
	value: Option<SecretString>,
	key: &'static str,
	env: &'static str,
) -> Result<SecretString, ConfigError> {
	match value {
		Some(secret) if !secret.is_blank() => Ok(secret),
		_ => Err(ConfigError::MissingRequired {
			key,
			env,
			section: "auth",
		}),
	}
}

fn validate(config: &AuthConfig) -> Result<(), ConfigError> {
	if config.session_ttl_secs <= 0 {
		return Err(ConfigError::Validation(
			"auth.session_ttl_secs must be positive".to_string(),
		));
	}
	for (key, cost) in [
		("password_hash", config.password_hash),
		("note_key_hash", config.note_key_hash),
	] {
		if cost.memory_kib == 0 || cost.iterations == 0 {
			return Err(ConfigError::Validation(format!(
				"auth.{key} memory and iterations must be non-zero"
			)));
		}
	}
	if config.session_cookie == config.federated_cookie {
		return Err(ConfigError::Validation(
			"auth.session_cookie and auth.federated_cookie must differ".to_string(),
		));
	}
	if config.session_secret == config.federated_secret {
		return Err(ConfigError::Validation(
			"auth.session_secret and auth.federated_secret must differ".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_secrets() -> AuthConfigLayer {
		AuthConfigLayer {
			session_secret: Some("session-secret".into()),
			federated_secret: Some("federated-secret".into()),
			..Default::default()
		}
	}

	#[test]
	fn defaults_once_secrets_present() {
		let config = with_secrets().finalize().unwrap();
		assert_eq!(config.environment, "development");
		assert_eq!(config.session_ttl_secs, 604_800);
		assert_eq!(config.password_hash, HashCost::default());
		assert_eq!(config.credential_precedence, CredentialPrecedence::FederatedFirst);
		assert_eq!(config.session_cookie, "notex_session");
		assert!(!config.secure_cookies);
	}

	#[test]
	fn missing_secret_is_an_error() {
		let err = AuthConfigLayer::default().finalize().unwrap_err();
		assert!(err.to_string().contains("NOTEX_SERVER_AUTH_SESSION_SECRET"));

		let err = AuthConfigLayer {
			session_secret: Some("s".into()),
			federated_secret: Some("   ".into()),
			..Default::default()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("auth.federated_secret"));
	}

	#[test]
	fn production_defaults_to_secure_cookies() {
		let config = AuthConfigLayer {
			environment: Some("production".to_string()),
			..with_secrets()
		}
		.finalize()
		.unwrap();
		assert!(config.secure_cookies);
		assert!(config.cookie_settings().secure);
	}

	#[test]
	fn hash_costs_are_independent() {
		let config = AuthConfigLayer {
			password_hash_iterations: Some(4),
			note_key_hash_memory_kib: Some(1024),
			note_key_hash_iterations: Some(1),
			..with_secrets()
		}
		.finalize()
		.unwrap();
		assert_eq!(config.password_hash, HashCost::new(19456, 4));
		assert_eq!(config.note_key_hash, HashCost::new(1024, 1));
	}

	#[test]
	fn zero_cost_is_rejected() {
		let err = AuthConfigLayer {
			password_hash_iterations: Some(0),
			..with_secrets()
		}
		.finalize()
		.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn shared_secret_between_kinds_is_rejected() {
		let err = AuthConfigLayer {
			session_secret: Some("same".into()),
			federated_secret: Some("same".into()),
			..Default::default()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("must differ"));
	}

	#[test]
	fn merge_overrides_precedence() {
		let mut base = with_secrets();
		base.merge(AuthConfigLayer {
			credential_precedence: Some(CredentialPrecedence::SelfIssuedFirst),
			..Default::default()
		});
		let config = base.finalize().unwrap();
		assert_eq!(
			config.credential_precedence,
			CredentialPrecedence::SelfIssuedFirst
		);
		assert_eq!(config.session_secret.expose(), "session-secret");
	}
}
