// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Order in which session-token kinds are tried.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::token::TokenKind;

/// Which credential wins when a request carries both kinds.
///
/// Both kinds resolve to the same [`crate::Identity`], so the choice only
/// matters when they disagree (for example after signing in as one account
/// and then federating as another). The resolver stops at the first kind in
/// this order that verifies; the other token is never consulted. Within one
/// kind, every presented token is tried (bearer header before session cookie).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPrecedence {
	/// Federated sign-in token first, then the NoteX session token.
	#[default]
	FederatedFirst,
	/// NoteX session token first, then the federated sign-in token.
	SelfIssuedFirst,
}

impl CredentialPrecedence {
	pub fn order(&self) -> [TokenKind; 2] {
		match self {
			CredentialPrecedence::FederatedFirst => [TokenKind::Federated, TokenKind::SelfIssued],
			CredentialPrecedence::SelfIssuedFirst => [TokenKind::SelfIssued, TokenKind::Federated],
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			CredentialPrecedence::FederatedFirst => "federated_first",
			CredentialPrecedence::SelfIssuedFirst => "self_issued_first",
		}
	}
}

impl fmt::Display for CredentialPrecedence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for CredentialPrecedence {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"federated_first" => Ok(CredentialPrecedence::FederatedFirst),
			"self_issued_first" => Ok(CredentialPrecedence::SelfIssuedFirst),
			other => Err(format!(
				"unknown credential precedence '{other}' (expected federated_first or self_issued_first)"
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_tries_federated_first() {
		assert_eq!(
			CredentialPrecedence::default().order(),
			[TokenKind::Federated, TokenKind::SelfIssued]
		);
	}

	#[test]
	fn self_issued_first_reverses_order() {
		assert_eq!(
			CredentialPrecedence::SelfIssuedFirst.order(),
			[TokenKind::SelfIssued, TokenKind::Federated]
		);
	}

	#[test]
	fn parses_config_values() {
		assert_eq!(
			"SELF_ISSUED_FIRST".parse::<CredentialPrecedence>(),
			Ok(CredentialPrecedence::SelfIssuedFirst)
		);
		assert!("newest_first".parse::<CredentialPrecedence>().is_err());
	}
}
