// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request credentials to canonical identity.
//!
//! ```text
//! nothing attached ──────────────────────────────> Rejected(no_token)
//! for kind in precedence.order():
//!     absent or fails verification ─> next kind
//!     verifies ─> look up email ─┬─> Authenticated
//!                                └─> Rejected(user_not_found)
//! every attached kind failed ────────────────────> Rejected(invalid_token)
//! ```
//!
//! A token that verifies ends the search even when its user is gone, so the
//! other credential cannot stand in for a deleted account.

use std::sync::Arc;

use notex_server_auth::{
	AuthError, CredentialPrecedence, Identity, PresentedCredentials, RejectReason, SessionTokens,
	TokenKind,
};
use notex_server_db::{DbError, UserStore};

/// Outcome of resolving a request's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Authenticated { identity: Identity, via: TokenKind },
	Rejected(RejectReason),
}

impl Resolution {
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			Resolution::Authenticated { identity, .. } => Some(identity),
			Resolution::Rejected(_) => None,
		}
	}

	/// Rejections become [`AuthError::Rejected`].
	pub fn into_result(self) -> Result<Identity, AuthError> {
		match self {
			Resolution::Authenticated { identity, .. } => Ok(identity),
			Resolution::Rejected(reason) => Err(AuthError::Rejected(reason)),
		}
	}
}

#[derive(Clone)]
pub struct SessionResolver {
	users: Arc<dyn UserStore>,
	tokens: SessionTokens,
	precedence: CredentialPrecedence,
}

impl SessionResolver {
	pub fn new(users: Arc<dyn UserStore>, tokens: SessionTokens, precedence: CredentialPrecedence) -> Self {
		Self {
			users,
			tokens,
			precedence,
		}
	}

	pub fn precedence(&self) -> CredentialPrecedence {
		self.precedence
	}

	/// Only store failures are errors; every authentication outcome is a
	/// [`Resolution`].
	#[tracing::instrument(skip_all, fields(precedence = %self.precedence))]
	pub async fn resolve(&self, credentials: &PresentedCredentials) -> Result<Resolution, DbError> {
		if credentials.is_empty() {
			return Ok(Resolution::Rejected(RejectReason::NoToken));
		}

		let attempts = self
			.precedence
			.order()
			.into_iter()
			.flat_map(|kind| credentials.candidates(kind).iter().map(move |token| (kind, token)))
			.collect::<Vec<_>>();

		for (kind, token) in attempts {
			let verified = match self.tokens.verify(kind, token.expose()) {
				Ok(verified) => verified,
				Err(e) => {
					tracing::debug!(%kind, error = %e, "credential failed verification");
					continue;
				}
			};

			return Ok(match self.users.get_user_by_email(&verified.email).await? {
				Some(user) => {
					tracing::debug!(%kind, user_id = %user.id, "credential resolved");
					Resolution::Authenticated {
						identity: user.identity(),
						via: kind,
					}
				}
				None => {
					tracing::debug!(%kind, "credential verified for unknown user");
					Resolution::Rejected(RejectReason::UserNotFound)
				}
			});
		}

		Ok(Resolution::Rejected(RejectReason::InvalidToken))
	}
}
