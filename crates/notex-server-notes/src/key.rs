// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object naming.
//!
//! An upload of `notes1` as PNG by `bob` at `1700000000123` ms lands at
//! `bob/private/notes1.1700000000123.png`.

use chrono::{DateTime, Utc};
use notex_server_auth::{ImageContentType, Visibility};

/// `{base}.{created_ms}.{ext}`.
pub fn object_name(base: &str, created_at: DateTime<Utc>, content_type: ImageContentType) -> String {
	format!(
		"{base}.{}.{}",
		created_at.timestamp_millis(),
		content_type.extension()
	)
}

/// `{owner_display_name}/{visibility}/{object_name}`.
pub fn object_key(owner_display_name: &str, visibility: Visibility, object_name: &str) -> String {
	format!("{owner_display_name}/{visibility}/{object_name}")
}
