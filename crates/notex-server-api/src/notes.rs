// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note API types.

use chrono::{DateTime, Utc};
use notex_server_auth::SecretString;
use notex_server_db::Note;
use notex_server_notes::{Dashboard, NoteView, UploadGrant, UploadRequest};
use notex_server_storage::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Request body for an upload capability.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UploadNoteRequest {
	/// `public` or `private`.
	pub visibility: String,
	/// Base name; a timestamp and extension are appended.
	pub name: String,
	pub size: i64,
	/// `image/jpeg` or `image/png`.
	pub content_type: String,
	/// Required for private notes.
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = Password))]
	pub image_key: Option<SecretString>,
}

impl From<UploadNoteRequest> for UploadRequest {
	fn from(request: UploadNoteRequest) -> Self {
		UploadRequest {
			visibility: request.visibility,
			name: request.name,
			size: request.size,
			content_type: request.content_type,
			image_key: request.image_key,
		}
	}
}

/// Request body for a read capability. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccessNoteRequest {
	#[serde(default)]
	#[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = Password))]
	pub image_key: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListNotesQuery {
	/// `public` or `private`; omit for both.
	pub visibility: Option<String>,
}

/// A pre-signed URL and what the holder must send with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResponse {
	pub url: String,
	/// `PUT` or `GET`.
	pub method: String,
	pub headers: BTreeMap<String, String>,
	pub expires_at: DateTime<Utc>,
}

impl From<&Capability> for CapabilityResponse {
	fn from(capability: &Capability) -> Self {
		Self {
			url: capability.url.clone(),
			method: capability.method.as_str().to_string(),
			headers: capability.headers.clone(),
			expires_at: capability.expires_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
	pub display_name: String,
}

/// Note metadata. The image-key hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
	pub id: String,
	pub visibility: String,
	pub name: String,
	pub content_type: String,
	pub size: i64,
	pub created_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<OwnerResponse>,
}

impl NoteResponse {
	fn from_note(note: &Note, owner_display_name: Option<&str>) -> Self {
		Self {
			id: note.id.to_string(),
			visibility: note.visibility.as_str().to_string(),
			name: note.name.clone(),
			content_type: note.content_type.mime().to_string(),
			size: note.size,
			created_at: note.created_at,
			owner: owner_display_name.map(|name| OwnerResponse {
				display_name: name.to_string(),
			}),
		}
	}
}

/// A note and the capability issued for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NoteGrantResponse {
	pub capability: CapabilityResponse,
	pub note: NoteResponse,
}

impl From<&UploadGrant> for NoteGrantResponse {
	fn from(grant: &UploadGrant) -> Self {
		Self {
			capability: CapabilityResponse::from(&grant.capability),
			note: NoteResponse::from_note(&grant.note, None),
		}
	}
}

impl From<&NoteView> for NoteGrantResponse {
	fn from(view: &NoteView) -> Self {
		Self {
			capability: CapabilityResponse::from(&view.capability),
			note: NoteResponse::from_note(&view.note, Some(&view.owner_display_name)),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NoteListResponse {
	pub notes: Vec<NoteGrantResponse>,
}

impl From<&[NoteView]> for NoteListResponse {
	fn from(views: &[NoteView]) -> Self {
		Self {
			notes: views.iter().map(NoteGrantResponse::from).collect(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
	pub public_notes: Vec<NoteGrantResponse>,
	pub private_notes: Vec<NoteGrantResponse>,
}

impl From<&Dashboard> for DashboardResponse {
	fn from(dashboard: &Dashboard) -> Self {
		Self {
			public_notes: dashboard.public_notes.iter().map(NoteGrantResponse::from).collect(),
			private_notes: dashboard.private_notes.iter().map(NoteGrantResponse::from).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use notex_server_auth::{ImageContentType, NoteId, UserId, Visibility};
	use notex_server_storage::CapabilityMethod;

	fn view() -> NoteView {
		NoteView {
			note: Note {
				id: NoteId::generate(),
				owner_id: UserId::generate(),
				name: "notes1.1700000000123.png".to_string(),
				visibility: Visibility::Private,
				content_type: ImageContentType::Png,
				size: 1024,
				object_key: "bob/private/notes1.1700000000123.png".to_string(),
				key_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
				created_at: Utc::now(),
			},
			owner_display_name: "bob".to_string(),
			capability: Capability {
				url: "https://storage.test/bob/private/notes1.1700000000123.png".to_string(),
				method: CapabilityMethod::Get,
				headers: BTreeMap::new(),
				expires_at: Utc::now(),
			},
		}
	}

	#[test]
	fn read_response_shape() {
		let json = serde_json::to_value(NoteGrantResponse::from(&view())).unwrap();

		assert_eq!(json["capability"]["method"], "GET");
		assert!(json["capability"]["expiresAt"].is_string());
		assert_eq!(json["note"]["visibility"], "private");
		assert_eq!(json["note"]["contentType"], "image/png");
		assert_eq!(json["note"]["owner"]["displayName"], "bob");
	}

	#[test]
	fn key_hash_and_object_key_are_never_serialized() {
		let body = serde_json::to_string(&NoteGrantResponse::from(&view())).unwrap();
		assert!(!body.contains("argon2"));
		assert!(!body.contains("keyHash"));
		assert!(!body.contains("objectKey"));
	}

	#[test]
	fn upload_request_image_key_is_optional() {
		let request: UploadNoteRequest = serde_json::from_str(
			r#"{"visibility":"public","name":"cat","size":10,"contentType":"image/jpeg"}"#,
		)
		.unwrap();
		assert!(UploadRequest::from(request).image_key.is_none());
	}

	#[test]
	fn dashboard_splits_lists() {
		let dashboard = Dashboard {
			public_notes: vec![],
			private_notes: vec![view()],
		};
		let json = serde_json::to_value(DashboardResponse::from(&dashboard)).unwrap();
		assert_eq!(json["publicNotes"].as_array().unwrap().len(), 0);
		assert_eq!(json["privateNotes"].as_array().unwrap().len(), 1);
	}
}
