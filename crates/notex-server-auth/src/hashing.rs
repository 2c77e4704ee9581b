// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-way hashing for passwords and image keys.
//!
//! Both use Argon2id with a salt per hash and a cost taken from
//! configuration. Passwords and image keys get separate [`SecretHasher`]s so
//! their costs can be tuned independently.
//!
//! Verification reads the parameters embedded in the stored PHC string, so
//! raising the configured cost never invalidates existing hashes.
//!
//! Hashing is CPU-bound by design. The async entry points run it on the
//! blocking pool so a login storm cannot stall the runtime workers.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use notex_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Argon2 work factor.
///
/// The default matches the argon2 crate's recommended parameters
/// (19 MiB memory, 2 iterations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCost {
	pub memory_kib: u32,
	pub iterations: u32,
}

impl HashCost {
	pub const fn new(memory_kib: u32, iterations: u32) -> Self {
		Self {
			memory_kib,
			iterations,
		}
	}

	fn params(&self) -> Result<Params, AuthError> {
		Params::new(self.memory_kib, self.iterations, Params::DEFAULT_P_COST, None)
			.map_err(|e| AuthError::Hashing(format!("invalid argon2 cost: {e}")))
	}
}

impl Default for HashCost {
	fn default() -> Self {
		Self::new(Params::DEFAULT_M_COST, Params::DEFAULT_T_COST)
	}
}

/// Salted Argon2id hasher with a fixed cost.
#[derive(Debug, Clone)]
pub struct SecretHasher {
	params: Params,
}

impl SecretHasher {
	pub fn new(cost: HashCost) -> Result<Self, AuthError> {
		Ok(Self {
			params: cost.params()?,
		})
	}

	fn argon2(&self) -> Argon2<'static> {
		Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
	}

	/// Hash on the current thread. Prefer [`SecretHasher::hash`] from async code.
	pub fn hash_blocking(&self, plaintext: &SecretString) -> Result<String, AuthError> {
		let salt = SaltString::generate(&mut OsRng);
		self
			.argon2()
			.hash_password(plaintext.expose().as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hashing(e.to_string()))
	}

	/// Compare on the current thread. An empty or malformed stored hash never
	/// matches.
	pub fn verify_blocking(&self, plaintext: &SecretString, stored_hash: &str) -> bool {
		if stored_hash.is_empty() {
			return false;
		}
		let Ok(parsed) = PasswordHash::new(stored_hash) else {
			tracing::warn!("stored hash is not a valid PHC string");
			return false;
		};
		self
			.argon2()
			.verify_password(plaintext.expose().as_bytes(), &parsed)
			.is_ok()
	}

	#[tracing::instrument(skip_all)]
	pub async fn hash(&self, plaintext: SecretString) -> Result<String, AuthError> {
		let hasher = self.clone();
		tokio::task::spawn_blocking(move || hasher.hash_blocking(&plaintext))
			.await
			.map_err(|e| AuthError::Hashing(format!("hashing task failed: {e}")))?
	}

	#[tracing::instrument(skip_all)]
	pub async fn verify(&self, plaintext: SecretString, stored_hash: String) -> Result<bool, AuthError> {
		let hasher = self.clone();
		tokio::task::spawn_blocking(move || hasher.verify_blocking(&plaintext, &stored_hash))
			.await
			.map_err(|e| AuthError::Hashing(format!("verification task failed: {e}")))
	}
}
