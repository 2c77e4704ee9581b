// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upload form validation.

use notex_server_auth::validation::is_key_segment;
use notex_server_auth::{ImageContentType, SecretString, ValidationErrors, Visibility};

pub const MAX_NAME_LEN: usize = 255;

/// An upload request as submitted, before validation.
#[derive(Debug, Clone)]
pub struct UploadRequest {
	pub visibility: String,
	pub name: String,
	pub size: i64,
	pub content_type: String,
	pub image_key: Option<SecretString>,
}

/// A validated upload. `image_key` is present exactly when the note is private.
#[derive(Debug, Clone)]
pub struct ValidUpload {
	pub visibility: Visibility,
	pub name: String,
	pub size: i64,
	pub content_type: ImageContentType,
	pub image_key: Option<SecretString>,
}

impl UploadRequest {
	pub fn validate(self) -> Result<ValidUpload, ValidationErrors> {
		let mut errors = ValidationErrors::new();

		let visibility = match self.visibility.parse::<Visibility>() {
			Ok(visibility) => Some(visibility),
			Err(_) => {
				errors.push("visibility", "visibility must be 'public' or 'private'");
				None
			}
		};

		let name_len = self.name.chars().count();
		if name_len == 0 || name_len > MAX_NAME_LEN {
			errors.push(
				"name",
				format!("name must be between 1 and {MAX_NAME_LEN} characters"),
			);
		} else if !is_key_segment(&self.name) {
			errors.push("name", "name cannot contain '/' or '\\' or be '.' or '..'");
		}

		if self.size <= 0 {
			errors.push("size", "size must be greater than zero");
		}

		let content_type = match self.content_type.parse::<ImageContentType>() {
			Ok(content_type) => Some(content_type),
			Err(_) => {
				errors.push("contentType", "content type must be image/jpeg or image/png");
				None
			}
		};

		let image_key = match visibility {
			Some(Visibility::Private) => match self.image_key {
				Some(key) if !key.is_blank() => Some(key),
				_ => {
					errors.push("imageKey", "an image key is required for private notes");
					None
				}
			},
			_ => None,
		};

		errors.finish()?;
		match (visibility, content_type) {
			(Some(visibility), Some(content_type)) => Ok(ValidUpload {
				visibility,
				name: self.name,
				size: self.size,
				content_type,
				image_key,
			}),
			_ => Err(ValidationErrors::single("upload", "invalid upload")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn private_png() -> UploadRequest {
		UploadRequest {
			visibility: "private".to_string(),
			name: "notes1".to_string(),
			size: 1024,
			content_type: "image/png".to_string(),
			image_key: Some("k1".into()),
		}
	}

	#[test]
	fn accepts_private_upload_with_key() {
		let upload = private_png().validate().unwrap();
		assert_eq!(upload.visibility, Visibility::Private);
		assert_eq!(upload.content_type, ImageContentType::Png);
		assert_eq!(upload.image_key.unwrap().expose(), "k1");
	}

	#[test]
	fn public_upload_drops_image_key() {
		let upload = UploadRequest {
			visibility: "public".to_string(),
			..private_png()
		}
		.validate()
		.unwrap();
		assert!(upload.image_key.is_none());
	}

	#[test]
	fn private_upload_needs_non_blank_key() {
		for key in [None, Some("".into()), Some("  ".into())] {
			let errors = UploadRequest {
				image_key: key,
				..private_png()
			}
			.validate()
			.unwrap_err();
			assert!(errors.has_field("imageKey"));
		}
	}

	#[test]
	fn reports_every_bad_field() {
		let errors = UploadRequest {
			visibility: "secret".to_string(),
			name: String::new(),
			size: 0,
			content_type: "image/gif".to_string(),
			image_key: None,
		}
		.validate()
		.unwrap_err();

		for field in ["visibility", "name", "size", "contentType"] {
			assert!(errors.has_field(field), "missing {field}");
		}
		assert!(!errors.has_field("imageKey"));
	}

	#[test]
	fn name_must_stay_inside_owner_scope() {
		for name in ["../../ann/private/x", "a/b", "a\\b", "..", "."] {
			let errors = UploadRequest {
				name: name.to_string(),
				..private_png()
			}
			.validate()
			.unwrap_err();
			assert!(errors.has_field("name"), "{name}");
		}

		let dotted = UploadRequest {
			name: "v1.2".to_string(),
			..private_png()
		};
		assert!(dotted.validate().is_ok());
	}

	#[test]
	fn name_length_bounds() {
		let at_limit = UploadRequest {
			name: "n".repeat(MAX_NAME_LEN),
			..private_png()
		};
		assert!(at_limit.validate().is_ok());

		let over = UploadRequest {
			name: "n".repeat(MAX_NAME_LEN + 1),
			..private_png()
		};
		assert!(over.validate().unwrap_err().has_field("name"));
	}
}
