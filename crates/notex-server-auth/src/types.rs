// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared across the NoteX server crates.
//!
//! - **ID newtypes**: [`UserId`], [`NoteId`], [`AccessEventId`] wrap UUIDs so
//!   a note id can never be passed where a user id is expected
//! - **Tags**: [`Provider`], [`Visibility`], [`ImageContentType`], each with a
//!   stable lowercase wire/database form
//! - **[`Identity`]**: the canonical authenticated caller

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random (v4) ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn into_inner(self) -> Uuid {
				self.0
			}

			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user account.");
define_id_type!(NoteId, "Unique identifier for a note image record.");
define_id_type!(AccessEventId, "Unique identifier for an access event.");

/// Error for tag values that do not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownTag {
	pub kind: &'static str,
	pub value: String,
}

// =============================================================================
// Provider
// =============================================================================

/// How a user authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	/// Email and password held by NoteX.
	Credentials,
	/// Federated Google sign-in.
	Google,
}

impl Provider {
	pub fn as_str(&self) -> &'static str {
		match self {
			Provider::Credentials => "credentials",
			Provider::Google => "google",
		}
	}
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Provider {
	type Err = UnknownTag;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"credentials" => Ok(Provider::Credentials),
			"google" => Ok(Provider::Google),
			other => Err(UnknownTag {
				kind: "provider",
				value: other.to_string(),
			}),
		}
	}
}

// =============================================================================
// Visibility
// =============================================================================

/// Who may obtain a read capability for a note.
///
/// `Public` notes are readable by anyone who knows the id. `Private` notes
/// additionally require the image key chosen at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	Public,
	Private,
}

impl Visibility {
	pub fn as_str(&self) -> &'static str {
		match self {
			Visibility::Public => "public",
			Visibility::Private => "private",
		}
	}

	pub fn is_private(&self) -> bool {
		matches!(self, Visibility::Private)
	}
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Visibility {
	type Err = UnknownTag;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"public" => Ok(Visibility::Public),
			"private" => Ok(Visibility::Private),
			other => Err(UnknownTag {
				kind: "visibility",
				value: other.to_string(),
			}),
		}
	}
}

// =============================================================================
// Image content types
// =============================================================================

/// Accepted upload media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageContentType {
	Jpeg,
	Png,
}

impl ImageContentType {
	pub fn mime(&self) -> &'static str {
		match self {
			ImageContentType::Jpeg => "image/jpeg",
			ImageContentType::Png => "image/png",
		}
	}

	/// File extension appended to generated object names.
	pub fn extension(&self) -> &'static str {
		match self {
			ImageContentType::Jpeg => "jpeg",
			ImageContentType::Png => "png",
		}
	}
}

impl fmt::Display for ImageContentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.mime())
	}
}

impl FromStr for ImageContentType {
	type Err = UnknownTag;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"image/jpeg" => Ok(ImageContentType::Jpeg),
			"image/png" => Ok(ImageContentType::Png),
			other => Err(UnknownTag {
				kind: "content type",
				value: other.to_string(),
			}),
		}
	}
}

// =============================================================================
// Identity
// =============================================================================

/// The canonical authenticated caller.
///
/// Always built from a fresh user lookup, never from token claims beyond the
/// email used to find the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub user_id: UserId,
	pub email: String,
	pub display_name: String,
	pub provider: Provider,
}
