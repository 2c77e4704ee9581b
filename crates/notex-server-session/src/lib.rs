// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Who is calling, and how they became that.
//!
//! - [`AccountService`] creates accounts, checks passwords and links
//!   federated sign-ins to accounts.
//! - [`SessionResolver`] turns the credentials attached to a request into an
//!   [`Identity`](notex_server_auth::Identity) or a rejection reason.

pub mod account;
pub mod error;
pub mod resolver;

pub use account::{AccountService, FederatedProfile, NewAccount, SignedIn};
pub use error::{AccountError, Result};
pub use resolver::{Resolution, SessionResolver};
