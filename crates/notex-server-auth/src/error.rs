// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication error types.

use http::StatusCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Why a request could not be resolved to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
	/// Neither credential kind was attached.
	NoToken,
	/// Every attached credential failed signature, structure or expiry checks.
	InvalidToken,
	/// A credential verified, but its email matches no account.
	UserNotFound,
}

impl RejectReason {
	/// Machine-readable reason tag.
	pub fn as_str(&self) -> &'static str {
		match self {
			RejectReason::NoToken => "no_token",
			RejectReason::InvalidToken => "invalid_token",
			RejectReason::UserNotFound => "user_not_found",
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			RejectReason::NoToken => "no token found",
			RejectReason::InvalidToken => "invalid or expired token",
			RejectReason::UserNotFound => "user not found",
		}
	}
}

impl fmt::Display for RejectReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("validation failed: {0}")]
	Validation(#[from] ValidationErrors),

	/// Unknown email, wrong password and federated-only accounts all map here.
	#[error("invalid email or password")]
	InvalidCredentials,

	#[error("unauthenticated: {}", .0.message())]
	Rejected(RejectReason),

	#[error("token error: {0}")]
	Token(#[from] jsonwebtoken::errors::Error),

	#[error("hashing failed: {0}")]
	Hashing(String),
}

impl AuthError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			AuthError::Validation(_) => StatusCode::BAD_REQUEST,
			AuthError::InvalidCredentials | AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
			AuthError::Token(_) | AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Internal errors are logged and answered with a generic message.
	pub fn is_internal(&self) -> bool {
		self.status_code().is_server_error()
	}
}
