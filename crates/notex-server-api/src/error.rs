// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error body shared by every endpoint.

use notex_server_auth::{FieldError, ValidationErrors};
use serde::{Deserialize, Serialize};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// `error` is a machine-readable reason tag such as `invalid_image_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fields: Option<Vec<FieldErrorResponse>>,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
			fields: None,
		}
	}

	pub fn validation(errors: &ValidationErrors) -> Self {
		Self {
			error: "validation_failed".to_string(),
			message: "request validation failed".to_string(),
			fields: Some(errors.errors().iter().map(FieldErrorResponse::from).collect()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FieldErrorResponse {
	pub field: String,
	pub message: String,
}

impl From<&FieldError> for FieldErrorResponse {
	fn from(error: &FieldError) -> Self {
		Self {
			field: error.field.clone(),
			message: error.message.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_error_omits_fields() {
		let json = serde_json::to_value(ErrorResponse::new("not_owner", "nope")).unwrap();
		assert_eq!(json, serde_json::json!({"error": "not_owner", "message": "nope"}));
	}

	#[test]
	fn validation_error_lists_fields() {
		let mut errors = ValidationErrors::new();
		errors.push("email", "invalid email address");
		errors.push("password", "too short");

		let json = serde_json::to_value(ErrorResponse::validation(&errors)).unwrap();
		assert_eq!(json["error"], "validation_failed");
		assert_eq!(json["fields"][1]["field"], "password");
	}
}
