// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("invalid object key: {0}")]
	InvalidKey(String),

	#[error("invalid capability lifetime: {0}")]
	InvalidExpiry(String),

	#[error("invalid storage endpoint: {0}")]
	InvalidEndpoint(String),

	#[error("signing failed: {0}")]
	Signing(String),

	#[error("storage unavailable: {0}")]
	Unavailable(String),
}
