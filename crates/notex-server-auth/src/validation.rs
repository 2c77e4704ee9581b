// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field-level input validation.
//!
//! Checks push into a [`ValidationErrors`] collector rather than returning
//! early, so a client gets every problem with a form in one response.

use notex_common_secret::SecretString;
use serde::Serialize;
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_DISPLAY_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
	pub field: String,
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
	errors: Vec<FieldError>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = Self::new();
		errors.push(field, message);
		errors
	}

	pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors.push(FieldError {
			field: field.into(),
			message: message.into(),
		});
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn errors(&self) -> &[FieldError] {
		&self.errors
	}

	pub fn has_field(&self, field: &str) -> bool {
		self.errors.iter().any(|e| e.field == field)
	}

	/// `Ok(())` when nothing was collected.
	pub fn finish(self) -> Result<(), ValidationErrors> {
		if self.errors.is_empty() {
			Ok(())
		} else {
			Err(self)
		}
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for error in &self.errors {
			if !first {
				f.write_str("; ")?;
			}
			write!(f, "{}: {}", error.field, error.message)?;
			first = false;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationErrors {}

/// Whether `email` has the shape `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
	if email.chars().any(char::is_whitespace) {
		return false;
	}
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};
	if local.is_empty() || domain.contains('@') {
		return false;
	}
	let labels: Vec<&str> = domain.split('.').collect();
	labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Trim and check an email; returns the trimmed value. Case is preserved.
pub fn check_email(errors: &mut ValidationErrors, email: &str) -> String {
	let email = email.trim();
	if email.is_empty() {
		errors.push("email", "email is required");
	} else if !is_valid_email(email) {
		errors.push("email", "invalid email address");
	}
	email.to_string()
}

pub fn check_password(errors: &mut ValidationErrors, password: &SecretString) {
	if password.expose().chars().count() < MIN_PASSWORD_LEN {
		errors.push(
			"password",
			format!("password must be at least {MIN_PASSWORD_LEN} characters"),
		);
	}
}

/// The part of an email before `@`.
pub fn email_local_part(email: &str) -> &str {
	email.split_once('@').map_or(email, |(local, _)| local)
}

/// Whether `value` can stand as one segment of an object key: no `/` or `\`
/// and not `.` or `..`. Display names and note names both become segments.
pub fn is_key_segment(value: &str) -> bool {
	!value.contains(['/', '\\']) && value != "." && value != ".."
}

/// Validate an optional display name, defaulting to the email local part.
pub fn check_display_name(
	errors: &mut ValidationErrors,
	display_name: Option<&str>,
	email: &str,
) -> String {
	match display_name.map(str::trim) {
		None => default_display_name(email),
		Some("") => {
			errors.push("displayName", "display name cannot be empty");
			String::new()
		}
		Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LEN => {
			errors.push(
				"displayName",
				format!("display name must be at most {MAX_DISPLAY_NAME_LEN} characters"),
			);
			String::new()
		}
		Some(name) if !is_key_segment(name) => {
			errors.push(
				"displayName",
				"display name cannot contain '/' or '\\' or be '.' or '..'",
			);
			String::new()
		}
		Some(name) => name.to_string(),
	}
}

/// Display name derived from an email, capped at the maximum length.
///
/// Separators become `_` so the result is always a key segment.
pub fn default_display_name(email: &str) -> String {
	let name: String = email_local_part(email)
		.chars()
		.take(MAX_DISPLAY_NAME_LEN)
		.map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
		.collect();
	if is_key_segment(&name) {
		name
	} else {
		name.replace('.', "_")
	}
}
