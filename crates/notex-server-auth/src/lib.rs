// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity primitives for the NoteX server.
//!
//! This crate owns everything about *who* is calling that does not need a
//! database:
//!
//! - [`types`]: id newtypes, provider/visibility tags, [`Identity`]
//! - [`user`]: the [`User`] record
//! - [`hashing`]: the argon2 [`SecretHasher`] used for passwords and image keys
//! - [`token`]: the two session-token kinds and their codec
//! - [`precedence`]: the configured order in which token kinds are tried
//! - [`cookie`]: reading credentials from requests and writing `Set-Cookie`
//! - [`validation`]: field-level input checks shared by every endpoint
//!
//! Store lookups and the resolver that ties these together live in
//! `notex-server-session`.

pub mod cookie;
pub mod error;
pub mod hashing;
pub mod precedence;
pub mod token;
pub mod types;
pub mod user;
pub mod validation;

pub use cookie::{extract_bearer_token, extract_cookie, CookieSettings, PresentedCredentials};
pub use error::{AuthError, RejectReason};
pub use hashing::{HashCost, SecretHasher};
pub use precedence::CredentialPrecedence;
pub use token::{IssuedToken, SessionTokens, TokenKind, VerifiedToken};
pub use types::{AccessEventId, Identity, ImageContentType, NoteId, Provider, UserId, Visibility};
pub use user::User;
pub use validation::{FieldError, ValidationErrors};

pub use notex_common_secret::SecretString;
