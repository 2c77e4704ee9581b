// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON body extractor that answers malformed bodies with `validation_failed`.
//!
//! axum's own [`Json`] rejects with a plain-text 400 or 422. [`ApiJson`]
//! turns every [`JsonRejection`] into a [`ServerError::Validation`] naming the
//! offending field when serde reports one, and `body` otherwise.

use axum::{
	extract::{rejection::JsonRejection, FromRequest, OptionalFromRequest, Request},
	Json,
};
use notex_server_auth::ValidationErrors;
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// Field name used when a rejection cannot be pinned to one field.
const BODY_FIELD: &str = "body";

pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
		Ok(ApiJson(value))
	}
}

/// An absent body (no `Content-Type`) is `None`; a present but malformed one
/// is still rejected.
impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
		let value = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
		Ok(value.map(|Json(value)| ApiJson(value)))
	}
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		let text = rejection.body_text();
		tracing::debug!(status = %rejection.status(), error = %text, "rejected JSON body");

		let errors = match &rejection {
			JsonRejection::JsonDataError(_) => {
				let detail = text.split_once(": ").map_or(text.as_str(), |(_, d)| d);
				ValidationErrors::single(rejected_field(detail), detail)
			}
			_ => ValidationErrors::single(BODY_FIELD, text.as_str()),
		};
		ServerError::Validation(errors)
	}
}

/// Field named by a serde error such as ``missing field `password` `` or
/// `size: invalid type: string "big", expected u64`.
fn rejected_field(detail: &str) -> String {
	if let Some(name) = detail
		.split_once("missing field `")
		.and_then(|(_, rest)| rest.split_once('`'))
		.map(|(name, _)| name)
	{
		return name.to_string();
	}
	match detail.split_once(": ") {
		Some((path, _)) if !path.is_empty() && path != "." && !path.contains(' ') => path.to_string(),
		_ => BODY_FIELD.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_field_is_named() {
		assert_eq!(
			rejected_field("missing field `password` at line 1 column 22"),
			"password"
		);
	}

	#[test]
	fn type_error_uses_path() {
		assert_eq!(
			rejected_field("size: invalid type: string \"big\", expected u64 at line 1 column 12"),
			"size"
		);
	}

	#[test]
	fn unplaced_error_falls_back_to_body() {
		assert_eq!(
			rejected_field("invalid type: integer `5`, expected a map at line 1 column 1"),
			"body"
		);
		assert_eq!(rejected_field("EOF while parsing a value"), "body");
	}
}
