// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loading secrets from the process environment.
//!
//! Signing keys and object-store credentials are usually mounted as files
//! (Docker secrets, Kubernetes secret volumes). For any variable `VAR`:
//!
//! 1. `VAR_FILE` set: the secret is read from that path, one trailing newline
//!    (`\n` or `\r\n`) stripped.
//! 2. Otherwise `VAR` set and non-empty: used as-is.
//! 3. Otherwise: `Ok(None)`.

use std::path::PathBuf;
use std::{env, fs};

use notex_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load `var` using the `VAR` / `VAR_FILE` convention.
///
/// ```no_run
/// use notex_common_config::load_secret_env;
///
/// if let Some(key) = load_secret_env("NOTEX_SERVER_AUTH_SESSION_SECRET")? {
///     println!("session secret: {key}"); // prints [REDACTED]
/// }
/// # Ok::<(), notex_common_config::SecretEnvError>(())
/// ```
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let trimmed = content
			.strip_suffix("\r\n")
			.or_else(|| content.strip_suffix('\n'))
			.unwrap_or(&content);
		return Ok(Some(SecretString::new(trimmed.to_string())));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}
