// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Issuers for tests in this and dependent crates.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::capability::{Capability, CapabilityIssuer, CapabilityMethod, CapabilityRequest};
use crate::error::StorageError;

/// Returns `https://storage.test/{key}?method=...` and counts calls.
#[derive(Debug, Default)]
pub struct StubIssuer {
	issued: AtomicUsize,
}

impl StubIssuer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn issued(&self) -> usize {
		self.issued.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl CapabilityIssuer for StubIssuer {
	async fn issue(&self, request: CapabilityRequest) -> Result<Capability, StorageError> {
		request.validate()?;
		self.issued.fetch_add(1, Ordering::SeqCst);

		let mut headers = BTreeMap::new();
		if let CapabilityMethod::Put { content_type } = &request.method {
			headers.insert("Content-Type".to_string(), content_type.clone());
		}
		let expires_at = Utc::now()
			+ chrono::Duration::from_std(request.expires_in)
				.map_err(|e| StorageError::InvalidExpiry(e.to_string()))?;

		Ok(Capability {
			url: format!(
				"https://storage.test/{}?method={}",
				request.key,
				request.method.as_str()
			),
			method: request.method,
			headers,
			expires_at,
		})
	}
}

/// Fails every request, or only uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingIssuer {
	pub uploads_only: bool,
}

#[async_trait]
impl CapabilityIssuer for FailingIssuer {
	async fn issue(&self, request: CapabilityRequest) -> Result<Capability, StorageError> {
		let fails = !self.uploads_only || matches!(request.method, CapabilityMethod::Put { .. });
		if fails {
			return Err(StorageError::Unavailable("injected failure".to_string()));
		}
		StubIssuer::new().issue(request).await
	}
}
