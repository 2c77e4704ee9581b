// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use notex_common_config::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, GoogleOAuthConfigLayer, HttpConfigLayer,
	LoggingConfigLayer, OAuthConfigLayer, StorageConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/notex/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: NOTEX_SERVER_<SECTION>_<FIELD>. Secrets also accept a
/// `<NAME>_FILE` variant pointing at a mounted secret file.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			auth: Some(load_auth_from_env()?),
			storage: Some(load_storage_from_env()?),
			oauth: Some(load_oauth_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	env_parse(name, "u16")
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
	env_parse(name, "u32")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	env_parse(name, "u64")
}

fn env_i64(name: &str) -> Result<Option<i64>, ConfigError> {
	env_parse(name, "i64")
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("NOTEX_SERVER_HOST"),
		port: env_u16("NOTEX_SERVER_PORT")?,
		base_url: env_var("NOTEX_SERVER_BASE_URL"),
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: env_var("NOTEX_SERVER_DATABASE_URL"),
		max_connections: env_u32("NOTEX_SERVER_DATABASE_MAX_CONNECTIONS")?,
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	let credential_precedence = match env_var("NOTEX_SERVER_AUTH_CREDENTIAL_PRECEDENCE") {
		Some(v) => Some(v.parse().map_err(|message| ConfigError::InvalidValue {
			key: "NOTEX_SERVER_AUTH_CREDENTIAL_PRECEDENCE".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(AuthConfigLayer {
		environment: env_var("NOTEX_SERVER_ENV"),
		session_secret: load_secret_env("NOTEX_SERVER_AUTH_SESSION_SECRET")?,
		federated_secret: load_secret_env("NOTEX_SERVER_AUTH_FEDERATED_SECRET")?,
		session_ttl_secs: env_i64("NOTEX_SERVER_AUTH_SESSION_TTL_SECS")?,
		password_hash_memory_kib: env_u32("NOTEX_SERVER_AUTH_PASSWORD_HASH_MEMORY_KIB")?,
		password_hash_iterations: env_u32("NOTEX_SERVER_AUTH_PASSWORD_HASH_ITERATIONS")?,
		note_key_hash_memory_kib: env_u32("NOTEX_SERVER_AUTH_NOTE_KEY_HASH_MEMORY_KIB")?,
		note_key_hash_iterations: env_u32("NOTEX_SERVER_AUTH_NOTE_KEY_HASH_ITERATIONS")?,
		credential_precedence,
		session_cookie: env_var("NOTEX_SERVER_AUTH_SESSION_COOKIE"),
		federated_cookie: env_var("NOTEX_SERVER_AUTH_FEDERATED_COOKIE"),
		secure_cookies: env_bool("NOTEX_SERVER_AUTH_SECURE_COOKIES"),
	})
}

fn load_storage_from_env() -> Result<StorageConfigLayer, ConfigError> {
	Ok(StorageConfigLayer {
		bucket: env_var("NOTEX_SERVER_STORAGE_BUCKET"),
		region: env_var("NOTEX_SERVER_STORAGE_REGION"),
		endpoint: env_var("NOTEX_SERVER_STORAGE_ENDPOINT"),
		force_path_style: env_bool("NOTEX_SERVER_STORAGE_FORCE_PATH_STYLE"),
		access_key_id: env_var("NOTEX_SERVER_STORAGE_ACCESS_KEY_ID"),
		secret_access_key: load_secret_env("NOTEX_SERVER_STORAGE_SECRET_ACCESS_KEY")?,
		capability_ttl_secs: env_u64("NOTEX_SERVER_STORAGE_CAPABILITY_TTL_SECS")?,
	})
}

fn load_oauth_from_env() -> Result<OAuthConfigLayer, ConfigError> {
	let google = GoogleOAuthConfigLayer {
		client_id: env_var("NOTEX_SERVER_GOOGLE_CLIENT_ID"),
		client_secret: load_secret_env("NOTEX_SERVER_GOOGLE_CLIENT_SECRET")?,
		redirect_uri: env_var("NOTEX_SERVER_GOOGLE_REDIRECT_URI"),
		scopes: None,
	};

	Ok(OAuthConfigLayer {
		google: Some(google),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("NOTEX_SERVER_LOG_FORMAT") {
		Some(v) => Some(v.parse().map_err(|message| ConfigError::InvalidValue {
			key: "NOTEX_SERVER_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("NOTEX_SERVER_LOG_LEVEL"),
		format,
	})
}
