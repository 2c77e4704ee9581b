// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account lifecycle: sign-up, password login and federated create-or-link.

use std::sync::Arc;

use notex_server_auth::validation::{
	check_display_name, check_email, check_password, default_display_name, is_key_segment,
	MAX_DISPLAY_NAME_LEN,
};
use notex_server_auth::{
	AuthError, IssuedToken, Provider, SecretHasher, SecretString, SessionTokens, User,
	ValidationErrors,
};
use notex_server_db::{DbError, UserStore};

use crate::error::{AccountError, Result};

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct NewAccount {
	pub email: String,
	pub password: SecretString,
	pub display_name: Option<String>,
}

/// What an external provider vouched for.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
	pub email: String,
	pub display_name: Option<String>,
	pub provider: Provider,
}

/// A user together with the session token just minted for them.
#[derive(Debug, Clone)]
pub struct SignedIn {
	pub user: User,
	pub token: IssuedToken,
}

#[derive(Clone)]
pub struct AccountService {
	users: Arc<dyn UserStore>,
	password_hasher: SecretHasher,
	tokens: SessionTokens,
}

impl AccountService {
	pub fn new(users: Arc<dyn UserStore>, password_hasher: SecretHasher, tokens: SessionTokens) -> Self {
		Self {
			users,
			password_hasher,
			tokens,
		}
	}

	/// Validate the form, hash the password and insert the user.
	#[tracing::instrument(skip(self, account))]
	pub async fn create_account(&self, account: NewAccount) -> Result<User> {
		let mut errors = ValidationErrors::new();
		let email = check_email(&mut errors, &account.email);
		check_password(&mut errors, &account.password);
		let display_name = check_display_name(&mut errors, account.display_name.as_deref(), &email);
		errors.finish().map_err(AuthError::from)?;

		let password_hash = self.password_hasher.hash(account.password).await?;
		let user = User::new_local(email, display_name, password_hash);

		match self.users.create_user(&user).await {
			Ok(()) => {
				tracing::info!(user_id = %user.id, "account created");
				Ok(user)
			}
			Err(DbError::Conflict(_)) => Err(AccountError::EmailTaken),
			Err(e) => Err(e.into()),
		}
	}

	/// Check an email/password pair and mint a self-issued session token.
	///
	/// Unknown email, an account without a local password and a wrong
	/// password are indistinguishable to the caller.
	#[tracing::instrument(skip(self, email, password))]
	pub async fn login(&self, email: &str, password: SecretString) -> Result<SignedIn> {
		let mut errors = ValidationErrors::new();
		let email = check_email(&mut errors, email);
		check_password(&mut errors, &password);
		errors.finish().map_err(AuthError::from)?;

		let Some(user) = self.users.get_user_by_email(&email).await? else {
			tracing::debug!("login for unknown email");
			return Err(AuthError::InvalidCredentials.into());
		};
		if !user.has_local_password() {
			tracing::debug!(user_id = %user.id, "login for account without local password");
			return Err(AuthError::InvalidCredentials.into());
		}

		let valid = self
			.password_hasher
			.verify(password, user.password_hash.clone())
			.await?;
		if !valid {
			tracing::debug!(user_id = %user.id, "wrong password");
			return Err(AuthError::InvalidCredentials.into());
		}

		let token = self.tokens.issue_self_issued(user.id, &user.email)?;
		tracing::info!(user_id = %user.id, "password login succeeded");
		Ok(SignedIn { user, token })
	}

	/// Find or create the account for a federated sign-in and mint a
	/// federated session token.
	///
	/// An existing `credentials` account is switched to the provider with its
	/// password hash untouched, so password login keeps working.
	#[tracing::instrument(skip(self, profile), fields(provider = %profile.provider))]
	pub async fn link_federated(&self, profile: FederatedProfile) -> Result<SignedIn> {
		let user = match self.users.get_user_by_email(&profile.email).await? {
			Some(existing) => self.link_existing(existing, profile.provider).await?,
			None => self.create_federated(&profile).await?,
		};

		let token = self.tokens.issue_federated(
			&user.email,
			Some(user.display_name.as_str()),
			profile.provider,
		)?;
		Ok(SignedIn { user, token })
	}

	async fn link_existing(&self, mut user: User, provider: Provider) -> Result<User> {
		if user.provider == Provider::Credentials && provider != Provider::Credentials {
			self.users.set_provider(&user.id, provider).await?;
			user.provider = provider;
			tracing::info!(user_id = %user.id, %provider, "linked existing account to provider");
		}
		Ok(user)
	}

	async fn create_federated(&self, profile: &FederatedProfile) -> Result<User> {
		let display_name = profile
			.display_name
			.as_deref()
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.map(|name| name.chars().take(MAX_DISPLAY_NAME_LEN).collect::<String>())
			.filter(|name| is_key_segment(name))
			.unwrap_or_else(|| default_display_name(&profile.email));
		let user = User::new_federated(profile.email.clone(), display_name, profile.provider);

		match self.users.create_user(&user).await {
			Ok(()) => {
				tracing::info!(user_id = %user.id, "account created by federated sign-in");
				Ok(user)
			}
			// A concurrent sign-in for the same email won the insert.
			Err(DbError::Conflict(_)) => self
				.users
				.get_user_by_email(&profile.email)
				.await?
				.ok_or_else(|| DbError::NotFound(profile.email.clone()).into()),
			Err(e) => Err(e.into()),
		}
	}
}
