// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Records stored by this crate and helpers for decoding their columns.

use chrono::{DateTime, SecondsFormat, Utc};
use notex_server_auth::{AccessEventId, ImageContentType, NoteId, UserId, Visibility};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;

/// Hash stored for public notes in place of an image-key hash.
pub const PUBLIC_KEY_SENTINEL: &str = "publicIMG";

/// A stored note image record.
///
/// The row exists from the moment an upload capability is issued, before
/// any bytes reach object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
	pub id: NoteId,
	pub owner_id: UserId,
	/// Object name, `{base}.{created_ms}.{ext}`.
	pub name: String,
	pub visibility: Visibility,
	pub content_type: ImageContentType,
	pub size: i64,
	/// Full object-storage key the capabilities are scoped to.
	pub object_key: String,
	/// Argon2 hash of the image key, or [`PUBLIC_KEY_SENTINEL`].
	pub key_hash: String,
	pub created_at: DateTime<Utc>,
}

/// One successful read-capability issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
	pub id: AccessEventId,
	pub note_id: NoteId,
	pub accessed_by: Option<UserId>,
	pub visibility: Visibility,
	pub accessed_at: DateTime<Utc>,
}

impl AccessEvent {
	pub fn new(note_id: NoteId, accessed_by: Option<UserId>, visibility: Visibility) -> Self {
		Self {
			id: AccessEventId::generate(),
			note_id,
			accessed_by,
			visibility,
			accessed_at: Utc::now(),
		}
	}
}

/// Fixed-width RFC 3339 so that `ORDER BY` on the text column is chronological.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {column} UUID: {e}")))
}

pub(crate) fn parse_tag<T>(value: &str, column: &str) -> Result<T, DbError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	value
		.parse()
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}
