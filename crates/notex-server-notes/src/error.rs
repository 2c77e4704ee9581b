// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note error types.

use http::StatusCode;
use notex_server_auth::{AuthError, ValidationErrors};
use notex_server_db::DbError;
use notex_server_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
	#[error("validation failed: {0}")]
	Validation(#[from] ValidationErrors),

	#[error("note not found")]
	NotFound,

	#[error("an image key is required for private notes")]
	ImageKeyRequired,

	#[error("invalid image key")]
	InvalidImageKey,

	#[error("only the owner can delete this note")]
	NotOwner,

	#[error("storage error: {0}")]
	Storage(#[from] StorageError),

	#[error("database error: {0}")]
	Database(#[from] DbError),

	#[error(transparent)]
	Auth(#[from] AuthError),
}

impl NoteError {
	/// Machine-readable reason tag.
	pub fn reason(&self) -> &'static str {
		match self {
			NoteError::Validation(_) => "validation_failed",
			NoteError::NotFound => "not_found",
			NoteError::ImageKeyRequired => "image_key_required",
			NoteError::InvalidImageKey => "invalid_image_key",
			NoteError::NotOwner => "not_owner",
			NoteError::Storage(_) | NoteError::Database(_) | NoteError::Auth(_) => "internal_error",
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			NoteError::Validation(_) => StatusCode::BAD_REQUEST,
			NoteError::NotFound => StatusCode::NOT_FOUND,
			NoteError::ImageKeyRequired | NoteError::InvalidImageKey | NoteError::NotOwner => {
				StatusCode::FORBIDDEN
			}
			NoteError::Storage(_) | NoteError::Database(_) | NoteError::Auth(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

pub type Result<T> = std::result::Result<T, NoteError>;
