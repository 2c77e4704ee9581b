// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use notex_server_auth::AuthError;
use notex_server_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error("an account with this email already exists")]
	EmailTaken,

	#[error("database error: {0}")]
	Database(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, AccountError>;
