// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for notex-server.

pub mod auth;
pub mod database;
pub mod http;
pub mod logging;
pub mod oauth;
pub mod storage;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use oauth::{GoogleOAuthConfig, GoogleOAuthConfigLayer, OAuthConfig, OAuthConfigLayer};
pub use storage::{StorageConfig, StorageConfigLayer};
