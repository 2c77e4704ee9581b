// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CSRF `state` for the Google sign-in round trip.
//!
//! The login route sets a random state in a short-lived cookie and sends the
//! same value to Google; the callback only proceeds when both agree.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

pub const OAUTH_STATE_COOKIE: &str = "notex_oauth_state";
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

pub fn generate_state() -> String {
	let mut bytes = [0u8; 32];
	rand::rngs::OsRng.fill_bytes(&mut bytes);
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time comparison of the returned state with the cookie value.
pub fn state_matches(expected: &str, returned: &str) -> bool {
	let (a, b) = (expected.as_bytes(), returned.as_bytes());
	if a.len() != b.len() || a.is_empty() {
		return false;
	}
	a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
