// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by NoteX crates.
//!
//! - [`Secret<T>`] re-exported from [`notex_common_secret`]
//! - [`load_secret_env`] for the `VAR` / `VAR_FILE` secret convention

pub mod env;

pub use notex_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, SecretEnvError};
