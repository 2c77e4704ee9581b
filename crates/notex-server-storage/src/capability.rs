// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The capability-issuer seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::StorageError;

/// Largest object key S3 accepts, in bytes.
pub const MAX_KEY_LEN: usize = 1024;

/// Longest validity a SigV4 query signature may carry.
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Direction of a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityMethod {
	/// Upload. The holder must send the given `Content-Type`.
	Put { content_type: String },
	/// Download.
	Get,
}

impl CapabilityMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			CapabilityMethod::Put { .. } => "PUT",
			CapabilityMethod::Get => "GET",
		}
	}
}

impl fmt::Display for CapabilityMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRequest {
	pub key: String,
	pub method: CapabilityMethod,
	pub expires_in: Duration,
}

impl CapabilityRequest {
	pub fn put(key: impl Into<String>, content_type: impl Into<String>, expires_in: Duration) -> Self {
		Self {
			key: key.into(),
			method: CapabilityMethod::Put {
				content_type: content_type.into(),
			},
			expires_in,
		}
	}

	pub fn get(key: impl Into<String>, expires_in: Duration) -> Self {
		Self {
			key: key.into(),
			method: CapabilityMethod::Get,
			expires_in,
		}
	}

	/// Reject keys and lifetimes no issuer can honour.
	pub fn validate(&self) -> Result<(), StorageError> {
		if self.key.is_empty() {
			return Err(StorageError::InvalidKey("key is empty".to_string()));
		}
		if self.key.starts_with('/') {
			return Err(StorageError::InvalidKey(
				"key must not start with '/'".to_string(),
			));
		}
		if self.key.len() > MAX_KEY_LEN {
			return Err(StorageError::InvalidKey(format!(
				"key is longer than {MAX_KEY_LEN} bytes"
			)));
		}
		if self.expires_in.is_zero() || self.expires_in > MAX_EXPIRY {
			return Err(StorageError::InvalidExpiry(format!(
				"must be between 1 and {} seconds",
				MAX_EXPIRY.as_secs()
			)));
		}
		Ok(())
	}
}

/// A bearer URL granting one kind of access to one object until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
	pub url: String,
	pub method: CapabilityMethod,
	/// Headers the holder must send with the request.
	pub headers: BTreeMap<String, String>,
	pub expires_at: DateTime<Utc>,
}

/// Issues time-limited capabilities for object storage.
///
/// Built once at startup and shared behind an `Arc<dyn CapabilityIssuer>`.
#[async_trait]
pub trait CapabilityIssuer: Send + Sync {
	async fn issue(&self, request: CapabilityRequest) -> Result<Capability, StorageError>;
}
