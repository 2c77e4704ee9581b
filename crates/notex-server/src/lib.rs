// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! NoteX HTTP server.
//!
//! Accounts and sessions, and pre-signed storage capabilities for note
//! images, behind an axum router.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod oauth_state;
pub mod routes;

pub use api::{create_app_state, create_app_state_with_issuer, create_router, AppState, StartupError};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use notex_server_config::ServerConfig;
