// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the NoteX server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`NOTEX_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use notex_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
///
/// There is no `Default`: signing secrets and storage credentials must come
/// from a file or the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub storage: StorageConfig,
	pub oauth: OAuthConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`NOTEX_SERVER_*`)
/// 2. Config file (`/etc/notex/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize()?;
	let storage = layer.storage.unwrap_or_default().finalize()?;
	let oauth = layer.oauth.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		environment = %auth.environment,
		credential_precedence = %auth.credential_precedence,
		secure_cookies = auth.secure_cookies,
		bucket = %storage.bucket,
		region = %storage.region,
		google_configured = oauth.google.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		storage,
		oauth,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn minimal_layer() -> ServerConfigLayer {
		ServerConfigLayer {
			auth: Some(AuthConfigLayer {
				session_secret: Some("session-secret".into()),
				federated_secret: Some("federated-secret".into()),
				..Default::default()
			}),
			storage: Some(StorageConfigLayer {
				bucket: Some("notex-images".to_string()),
				access_key_id: Some("AKIDEXAMPLE".to_string()),
				secret_access_key: Some("storage-secret".into()),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn finalize_minimal_layer() {
		let config = finalize(minimal_layer()).unwrap();
		assert_eq!(config.socket_addr(), "0.0.0.0:8080");
		assert_eq!(config.database.url, "sqlite:./notex.db");
		assert!(config.oauth.google.is_none());
	}

	#[test]
	fn finalize_requires_storage() {
		let layer = ServerConfigLayer {
			storage: None,
			..minimal_layer()
		};
		let err = finalize(layer).unwrap_err();
		assert!(matches!(err, ConfigError::MissingRequired { section: "storage", .. }));
	}

	#[test]
	fn finalize_requires_auth_secrets() {
		let layer = ServerConfigLayer {
			auth: None,
			..minimal_layer()
		};
		assert!(finalize(layer).is_err());
	}

	#[test]
	fn socket_addr_uses_host_and_port() {
		let mut layer = minimal_layer();
		layer.http = Some(HttpConfigLayer {
			host: Some("127.0.0.1".to_string()),
			port: Some(9000),
			base_url: None,
		});
		assert_eq!(finalize(layer).unwrap().socket_addr(), "127.0.0.1:9000");
	}
}
