// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Users are never deleted here. The only update is the provider switch made
//! when a local account first signs in through an external provider.

use async_trait::async_trait;
use notex_server_auth::{Provider, User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{format_timestamp, parse_tag, parse_timestamp, parse_uuid};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User) -> Result<(), DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn set_provider(&self, id: &UserId, provider: Provider) -> Result<bool, DbError>;
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn set_provider(&self, id: &UserId, provider: Provider) -> Result<bool, DbError> {
		self.set_provider(id, provider).await
	}
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user.
	///
	/// # Errors
	/// `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id, provider = %user.provider))]
	pub async fn create_user(&self, user: &User) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, password_hash, display_name, provider, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(&user.password_hash)
		.bind(&user.display_name)
		.bind(user.provider.as_str())
		.bind(format_timestamp(&user.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "user"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	/// Look a user up by exact email.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, password_hash, display_name, provider, created_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, password_hash, display_name, provider, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	/// Change the provider tag. The password hash is left untouched.
	///
	/// # Returns
	/// `true` if a row was updated.
	#[tracing::instrument(skip(self), fields(user_id = %id, provider = %provider))]
	pub async fn set_provider(&self, id: &UserId, provider: Provider) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE users SET provider = ? WHERE id = ?")
			.bind(provider.as_str())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let updated = result.rows_affected() > 0;
		if updated {
			tracing::info!(user_id = %id, provider = %provider, "user provider updated");
		}
		Ok(updated)
	}
}

fn parse_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let provider: String = row.get("provider");
	let created_at: String = row.get("created_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user id")?),
		email: row.get("email"),
		password_hash: row.get("password_hash"),
		display_name: row.get("display_name"),
		provider: parse_tag(&provider, "provider")?,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
