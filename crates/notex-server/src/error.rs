// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use notex_server_api::ErrorResponse;
use notex_server_auth::{AuthError, ValidationErrors};
use notex_server_db::DbError;
use notex_server_notes::NoteError;
use notex_server_session::AccountError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error(transparent)]
	Account(#[from] AccountError),

	#[error(transparent)]
	Note(#[from] NoteError),

	#[error("database error: {0}")]
	Db(#[from] DbError),

	#[error("validation failed: {0}")]
	Validation(#[from] ValidationErrors),

	/// The external sign-in flow failed; the message is safe to show.
	#[error("OAuth failed: {0}")]
	OAuth(String),

	#[error("OAuth provider is not configured")]
	OAuthNotConfigured,

	/// A handler ran without the authentication layer in front of it.
	#[error("request was not authenticated")]
	Unauthenticated,

	#[error("internal error: {0}")]
	Internal(String),
}

fn internal(error: &dyn std::fmt::Display) -> (StatusCode, ErrorResponse) {
	tracing::error!(error = %error, "internal error");
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		ErrorResponse::new("internal_error", "An internal error occurred"),
	)
}

fn from_auth(error: &AuthError) -> (StatusCode, ErrorResponse) {
	match error {
		AuthError::Validation(errors) => (StatusCode::BAD_REQUEST, ErrorResponse::validation(errors)),
		AuthError::InvalidCredentials => (
			StatusCode::UNAUTHORIZED,
			ErrorResponse::new("invalid_credentials", error.to_string()),
		),
		AuthError::Rejected(reason) => (
			StatusCode::UNAUTHORIZED,
			ErrorResponse::new(reason.as_str(), reason.message()),
		),
		AuthError::Token(_) | AuthError::Hashing(_) => internal(error),
	}
}

fn from_note(error: &NoteError) -> (StatusCode, ErrorResponse) {
	match error {
		NoteError::Validation(errors) => (StatusCode::BAD_REQUEST, ErrorResponse::validation(errors)),
		NoteError::Auth(inner) => from_auth(inner),
		NoteError::Storage(_) | NoteError::Database(_) => internal(error),
		NoteError::NotFound
		| NoteError::ImageKeyRequired
		| NoteError::InvalidImageKey
		| NoteError::NotOwner => (
			error.status_code(),
			ErrorResponse::new(error.reason(), error.to_string()),
		),
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::Auth(e) => from_auth(e),
			ServerError::Account(AccountError::Auth(e)) => from_auth(e),
			ServerError::Account(e @ AccountError::EmailTaken) => {
				(StatusCode::CONFLICT, ErrorResponse::new("conflict", e.to_string()))
			}
			ServerError::Account(AccountError::Database(e)) => internal(e),
			ServerError::Note(e) => from_note(e),
			ServerError::Db(e) => internal(e),
			ServerError::Validation(errors) => {
				(StatusCode::BAD_REQUEST, ErrorResponse::validation(errors))
			}
			ServerError::OAuth(msg) => {
				tracing::warn!(error = %msg, "OAuth sign-in failed");
				(
					StatusCode::BAD_REQUEST,
					ErrorResponse::new("oauth_failed", msg.clone()),
				)
			}
			ServerError::OAuthNotConfigured => (
				StatusCode::NOT_IMPLEMENTED,
				ErrorResponse::new("oauth_not_configured", self.to_string()),
			),
			ServerError::Unauthenticated => (
				StatusCode::UNAUTHORIZED,
				ErrorResponse::new("unauthenticated", self.to_string()),
			),
			ServerError::Internal(msg) => internal(msg),
		};

		(status, Json(body)).into_response()
	}
}
