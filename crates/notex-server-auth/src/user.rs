// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User account record.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::types::{Identity, Provider, UserId};

/// A NoteX account.
///
/// `email` is unique and compared exactly as stored. `password_hash` is an
/// argon2 PHC string, or empty for accounts that only ever signed in through
/// an external provider.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub password_hash: String,
	pub display_name: String,
	pub provider: Provider,
	pub created_at: DateTime<Utc>,
}

impl User {
	/// A new email/password account.
	pub fn new_local(
		email: impl Into<String>,
		display_name: impl Into<String>,
		password_hash: impl Into<String>,
	) -> Self {
		Self {
			id: UserId::generate(),
			email: email.into(),
			password_hash: password_hash.into(),
			display_name: display_name.into(),
			provider: Provider::Credentials,
			created_at: Utc::now(),
		}
	}

	/// A new account created by federated sign-in. It has no local password.
	pub fn new_federated(
		email: impl Into<String>,
		display_name: impl Into<String>,
		provider: Provider,
	) -> Self {
		Self {
			id: UserId::generate(),
			email: email.into(),
			password_hash: String::new(),
			display_name: display_name.into(),
			provider,
			created_at: Utc::now(),
		}
	}

	pub fn has_local_password(&self) -> bool {
		!self.password_hash.is_empty()
	}

	pub fn identity(&self) -> Identity {
		Identity {
			user_id: self.id,
			email: self.email.clone(),
			display_name: self.display_name.clone(),
			provider: self.provider,
		}
	}
}

// The hash stays out of logs even though it is not reversible.
impl fmt::Debug for User {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("User")
			.field("id", &self.id)
			.field("email", &self.email)
			.field("has_local_password", &self.has_local_password())
			.field("display_name", &self.display_name)
			.field("provider", &self.provider)
			.field("created_at", &self.created_at)
			.finish()
	}
}
