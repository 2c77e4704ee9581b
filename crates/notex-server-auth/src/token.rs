// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session tokens.
//!
//! Two independent HS256 JWT kinds can authenticate a request:
//!
//! | Kind | Minted by | Secret | Claims |
//! |------|-----------|--------|--------|
//! | [`TokenKind::SelfIssued`] | password login | `auth.session_secret` | `sub` (user id), `email`, `iat`, `exp` |
//! | [`TokenKind::Federated`] | external sign-in callback | `auth.federated_secret` | `email`, `name`, `provider`, `iat`, `exp` |
//!
//! Each kind is checked only with its own key, so a token of one kind can
//! never pass as the other. Only the email is trusted from a verified token;
//! everything else about the caller is re-read from the user store.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use notex_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;
use crate::types::{Provider, UserId};

/// Default validity window for both token kinds: seven days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	SelfIssued,
	Federated,
}

impl TokenKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			TokenKind::SelfIssued => "self_issued",
			TokenKind::Federated => "federated",
		}
	}
}

impl fmt::Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfIssuedClaims {
	pub sub: String,
	pub email: String,
	pub iat: i64,
	pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedClaims {
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provider: Option<String>,
	pub iat: i64,
	pub exp: i64,
}

/// A freshly minted token, ready to be placed in a cookie.
#[derive(Debug, Clone)]
pub struct IssuedToken {
	pub kind: TokenKind,
	pub token: SecretString,
	pub expires_at: DateTime<Utc>,
	pub max_age_secs: i64,
}

/// The trusted outcome of verifying a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
	pub kind: TokenKind,
	pub email: String,
}

#[derive(Clone)]
struct KeyPair {
	encoding: EncodingKey,
	decoding: DecodingKey,
}

impl KeyPair {
	fn from_secret(secret: &SecretString) -> Self {
		let bytes = secret.expose().as_bytes();
		Self {
			encoding: EncodingKey::from_secret(bytes),
			decoding: DecodingKey::from_secret(bytes),
		}
	}
}

/// Mints and verifies both session-token kinds.
#[derive(Clone)]
pub struct SessionTokens {
	self_issued: KeyPair,
	federated: KeyPair,
	ttl: Duration,
	validation: Validation,
}

impl fmt::Debug for SessionTokens {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionTokens")
			.field("ttl_secs", &self.ttl.num_seconds())
			.finish_non_exhaustive()
	}
}

impl SessionTokens {
	pub fn new(self_issued_secret: &SecretString, federated_secret: &SecretString, ttl: Duration) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp"]);

		Self {
			self_issued: KeyPair::from_secret(self_issued_secret),
			federated: KeyPair::from_secret(federated_secret),
			ttl,
			validation,
		}
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	fn keys(&self, kind: TokenKind) -> &KeyPair {
		match kind {
			TokenKind::SelfIssued => &self.self_issued,
			TokenKind::Federated => &self.federated,
		}
	}

	/// Mint a token after a successful password login.
	#[tracing::instrument(skip(self, email), fields(user_id = %user_id))]
	pub fn issue_self_issued(&self, user_id: UserId, email: &str) -> Result<IssuedToken, AuthError> {
		let now = Utc::now();
		let expires_at = now + self.ttl;
		let claims = SelfIssuedClaims {
			sub: user_id.to_string(),
			email: email.to_string(),
			iat: now.timestamp(),
			exp: expires_at.timestamp(),
		};
		let token = encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&self.self_issued.encoding,
		)?;
		Ok(self.issued(TokenKind::SelfIssued, token, expires_at))
	}

	/// Mint a token after a successful external sign-in.
	#[tracing::instrument(skip(self, email, name), fields(provider = %provider))]
	pub fn issue_federated(
		&self,
		email: &str,
		name: Option<&str>,
		provider: Provider,
	) -> Result<IssuedToken, AuthError> {
		let now = Utc::now();
		let expires_at = now + self.ttl;
		let claims = FederatedClaims {
			email: email.to_string(),
			name: name.map(str::to_string),
			provider: Some(provider.as_str().to_string()),
			iat: now.timestamp(),
			exp: expires_at.timestamp(),
		};
		let token = encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&self.federated.encoding,
		)?;
		Ok(self.issued(TokenKind::Federated, token, expires_at))
	}

	fn issued(&self, kind: TokenKind, token: String, expires_at: DateTime<Utc>) -> IssuedToken {
		IssuedToken {
			kind,
			token: SecretString::new(token),
			expires_at,
			max_age_secs: self.ttl.num_seconds(),
		}
	}

	/// Check signature, structure and expiry of a token of the given kind.
	pub fn verify(&self, kind: TokenKind, token: &str) -> Result<VerifiedToken, AuthError> {
		let decoding = &self.keys(kind).decoding;
		let email = match kind {
			TokenKind::SelfIssued => {
				decode::<SelfIssuedClaims>(token, decoding, &self.validation)?
					.claims
					.email
			}
			TokenKind::Federated => {
				decode::<FederatedClaims>(token, decoding, &self.validation)?
					.claims
					.email
			}
		};
		Ok(VerifiedToken { kind, email })
	}
}
