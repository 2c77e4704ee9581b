// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the NoteX server.
//!
//! Three tables, each behind an `#[async_trait]` store trait so services can
//! be tested against substitutes:
//!
//! | Table | Store | Repository |
//! |-------|-------|------------|
//! | `users` | [`UserStore`] | [`UserRepository`] |
//! | `notes` | [`NoteStore`] | [`NoteRepository`] |
//! | `access_events` | [`AccessEventStore`] | [`AccessEventRepository`] |
//!
//! Ids are stored as UUID text and timestamps as fixed-width RFC 3339 text.

pub mod access_event;
pub mod error;
pub mod migrations;
pub mod note;
pub mod pool;
pub mod testing;
pub mod types;
pub mod user;

pub use access_event::{AccessEventRepository, AccessEventStore};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use note::{NoteRepository, NoteStore};
pub use pool::create_pool;
pub use types::{AccessEvent, Note, PUBLIC_KEY_SENTINEL};
pub use user::{UserRepository, UserStore};

pub use sqlx::sqlite::SqlitePool;
