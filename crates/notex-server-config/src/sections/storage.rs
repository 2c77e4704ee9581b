// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object storage configuration for capability (pre-signed URL) issuance.

use notex_common_config::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_CAPABILITY_TTL_SECS: u64 = 3600;
/// SigV4 query signing allows at most seven days.
const MAX_CAPABILITY_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct StorageConfig {
	pub bucket: String,
	pub region: String,
	/// Custom S3-compatible endpoint (MinIO, R2, ...). `None` means AWS.
	pub endpoint: Option<String>,
	/// Address the bucket in the path instead of the host name.
	pub force_path_style: bool,
	pub access_key_id: String,
	pub secret_access_key: SecretString,
	pub capability_ttl_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfigLayer {
	#[serde(default)]
	pub bucket: Option<String>,
	#[serde(default)]
	pub region: Option<String>,
	#[serde(default)]
	pub endpoint: Option<String>,
	#[serde(default)]
	pub force_path_style: Option<bool>,
	#[serde(default)]
	pub access_key_id: Option<String>,
	#[serde(default)]
	pub secret_access_key: Option<SecretString>,
	#[serde(default)]
	pub capability_ttl_secs: Option<u64>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: StorageConfigLayer) {
		if other.bucket.is_some() {
			self.bucket = other.bucket;
		}
		if other.region.is_some() {
			self.region = other.region;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.force_path_style.is_some() {
			self.force_path_style = other.force_path_style;
		}
		if other.access_key_id.is_some() {
			self.access_key_id = other.access_key_id;
		}
		if other.secret_access_key.is_some() {
			self.secret_access_key = other.secret_access_key;
		}
		if other.capability_ttl_secs.is_some() {
			self.capability_ttl_secs = other.capability_ttl_secs;
		}
	}

	pub fn finalize(self) -> Result<StorageConfig, ConfigError> {
		let bucket = self
			.bucket
			.filter(|b| !b.is_empty())
			.ok_or(ConfigError::MissingRequired {
				key: "storage.bucket",
				env: "NOTEX_SERVER_STORAGE_BUCKET",
				section: "storage",
			})?;
		let access_key_id = self
			.access_key_id
			.filter(|k| !k.is_empty())
			.ok_or(ConfigError::MissingRequired {
				key: "storage.access_key_id",
				env: "NOTEX_SERVER_STORAGE_ACCESS_KEY_ID",
				section: "storage",
			})?;
		let secret_access_key = self
			.secret_access_key
			.filter(|k| !k.is_blank())
			.ok_or(ConfigError::MissingRequired {
				key: "storage.secret_access_key",
				env: "NOTEX_SERVER_STORAGE_SECRET_ACCESS_KEY",
				section: "storage",
			})?;

		let capability_ttl_secs = self
			.capability_ttl_secs
			.unwrap_or(DEFAULT_CAPABILITY_TTL_SECS);
		if capability_ttl_secs == 0 || capability_ttl_secs > MAX_CAPABILITY_TTL_SECS {
			return Err(ConfigError::InvalidValue {
				key: "storage.capability_ttl_secs".to_string(),
				message: format!("must be between 1 and {MAX_CAPABILITY_TTL_SECS}"),
			});
		}

		Ok(StorageConfig {
			bucket,
			region: self
				.region
				.filter(|r| !r.is_empty())
				.unwrap_or_else(|| DEFAULT_REGION.to_string()),
			endpoint: self
				.endpoint
				.filter(|e| !e.is_empty())
				.map(|e| e.trim_end_matches('/').to_string()),
			force_path_style: self.force_path_style.unwrap_or(false),
			access_key_id,
			secret_access_key,
			capability_ttl_secs,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn complete() -> StorageConfigLayer {
		StorageConfigLayer {
			bucket: Some("notex-images".to_string()),
			access_key_id: Some("AKIDEXAMPLE".to_string()),
			secret_access_key: Some("secret".into()),
			..Default::default()
		}
	}

	#[test]
	fn defaults() {
		let config = complete().finalize().unwrap();
		assert_eq!(config.region, "us-east-1");
		assert_eq!(config.capability_ttl_secs, 3600);
		assert!(config.endpoint.is_none());
		assert!(!config.force_path_style);
	}

	#[test]
	fn bucket_is_required() {
		let err = StorageConfigLayer {
			bucket: None,
			..complete()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("NOTEX_SERVER_STORAGE_BUCKET"));
	}

	#[test]
	fn ttl_is_bounded() {
		let err = StorageConfigLayer {
			capability_ttl_secs: Some(8 * 24 * 60 * 60),
			..complete()
		}
		.finalize()
		.unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}

	#[test]
	fn endpoint_trailing_slash_is_trimmed() {
		let config = StorageConfigLayer {
			endpoint: Some("http://localhost:9000/".to_string()),
			force_path_style: Some(true),
			..complete()
		}
		.finalize()
		.unwrap();
		assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
		assert!(config.force_path_style);
	}
}
