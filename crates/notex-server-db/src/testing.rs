// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for tests in this and dependent crates.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::migrations::run_migrations;
use crate::user::UserRepository;
use notex_server_auth::User;

/// In-memory database with every migration applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}

/// Insert a `credentials` user carrying a placeholder hash.
pub async fn insert_user(pool: &SqlitePool, email: &str, display_name: &str) -> User {
	let user = User::new_local(email, display_name, "$argon2id$placeholder");
	UserRepository::new(pool.clone())
		.create_user(&user)
		.await
		.unwrap();
	user
}
