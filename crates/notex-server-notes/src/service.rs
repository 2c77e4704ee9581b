// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The note capability gate.
//!
//! | Operation | Identity | Image key | Capability |
//! |-----------|----------|-----------|------------|
//! | [`NoteService::upload`] | required | required when private | `PUT` |
//! | [`NoteService::request_read`] | optional | required when private | `GET` |
//! | [`NoteService::list_owned`] / [`NoteService::dashboard`] | owner | no | `GET` each |
//! | [`NoteService::public_feed`] | no | no | `GET` each |
//! | [`NoteService::delete`] | owner | no | none |
//!
//! # Upload saga
//!
//! The note row and the upload capability are produced concurrently. If the
//! capability cannot be issued, the row is deleted again. A failed delete is
//! logged and left behind; nothing retries it.
//!
//! # Access events
//!
//! Only [`NoteService::request_read`] appends an access event, after its
//! capability is issued, and a failed write never fails the read. The `GET`
//! capabilities embedded in listings, the dashboard and the public feed are
//! previews and are not logged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use futures::future::try_join_all;
use notex_server_auth::{Identity, NoteId, SecretHasher, SecretString, UserId, Visibility};
use notex_server_db::{
	AccessEvent, AccessEventStore, DbError, Note, NoteStore, UserStore, PUBLIC_KEY_SENTINEL,
};
use notex_server_storage::{Capability, CapabilityIssuer, CapabilityRequest};

use crate::error::{NoteError, Result};
use crate::key::{object_key, object_name};
use crate::upload::{UploadRequest, ValidUpload};

/// Number of notes in the public feed.
pub const PUBLIC_FEED_LIMIT: i64 = 50;

/// A freshly created note and the capability to upload its bytes.
#[derive(Debug, Clone)]
pub struct UploadGrant {
	pub note: Note,
	pub capability: Capability,
}

/// A note the caller may read, with a capability to fetch its bytes.
#[derive(Debug, Clone)]
pub struct NoteView {
	pub note: Note,
	pub owner_display_name: String,
	pub capability: Capability,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
	pub public_notes: Vec<NoteView>,
	pub private_notes: Vec<NoteView>,
}

#[derive(Clone)]
pub struct NoteService {
	notes: Arc<dyn NoteStore>,
	users: Arc<dyn UserStore>,
	access_events: Arc<dyn AccessEventStore>,
	issuer: Arc<dyn CapabilityIssuer>,
	key_hasher: SecretHasher,
	capability_ttl: Duration,
}

impl NoteService {
	pub fn new(
		notes: Arc<dyn NoteStore>,
		users: Arc<dyn UserStore>,
		access_events: Arc<dyn AccessEventStore>,
		issuer: Arc<dyn CapabilityIssuer>,
		key_hasher: SecretHasher,
		capability_ttl: Duration,
	) -> Self {
		Self {
			notes,
			users,
			access_events,
			issuer,
			key_hasher,
			capability_ttl,
		}
	}

	/// Create a note owned by `owner` and issue the capability to upload it.
	#[tracing::instrument(skip(self, owner, request), fields(owner_id = %owner.user_id))]
	pub async fn upload(&self, owner: &Identity, request: UploadRequest) -> Result<UploadGrant> {
		let ValidUpload {
			visibility,
			name,
			size,
			content_type,
			image_key,
		} = request.validate()?;

		let key_hash = match image_key {
			Some(key) => self.key_hasher.hash(key).await?,
			None => PUBLIC_KEY_SENTINEL.to_string(),
		};

		// Millisecond precision, the same instant the object name carries.
		let created_at = Utc::now().trunc_subsecs(3);
		let name = object_name(&name, created_at, content_type);
		let note = Note {
			id: NoteId::generate(),
			owner_id: owner.user_id,
			object_key: object_key(&owner.display_name, visibility, &name),
			name,
			visibility,
			content_type,
			size,
			key_hash,
			created_at,
		};

		let put = CapabilityRequest::put(
			note.object_key.clone(),
			content_type.mime(),
			self.capability_ttl,
		);
		let (inserted, issued) = tokio::join!(self.notes.create_note(&note), self.issuer.issue(put));
		inserted?;

		let capability = match issued {
			Ok(capability) => capability,
			Err(e) => {
				tracing::error!(note_id = %note.id, error = %e, "upload capability issuance failed");
				self.roll_back(&note.id).await;
				return Err(e.into());
			}
		};

		tracing::info!(note_id = %note.id, %visibility, "upload capability issued");
		Ok(UploadGrant { note, capability })
	}

	async fn roll_back(&self, note_id: &NoteId) {
		match self.notes.delete_note(note_id).await {
			Ok(_) => tracing::info!(%note_id, "rolled back note row"),
			Err(e) => tracing::warn!(%note_id, error = %e, "rollback of note row failed"),
		}
	}

	/// Issue a read capability for one note.
	///
	/// Private notes need the image key whoever the caller is, the owner
	/// included. A successful read appends an access event in the background.
	#[tracing::instrument(
		skip(self, caller, image_key),
		fields(%note_id, caller_id = ?caller.map(|c| c.user_id))
	)]
	pub async fn request_read(
		&self,
		caller: Option<&Identity>,
		note_id: &NoteId,
		image_key: Option<SecretString>,
	) -> Result<NoteView> {
		let note = self
			.notes
			.get_note(note_id)
			.await?
			.ok_or(NoteError::NotFound)?;

		if note.visibility.is_private() {
			let key = image_key
				.filter(|key| !key.is_blank())
				.ok_or(NoteError::ImageKeyRequired)?;
			if !self.key_hasher.verify(key, note.key_hash.clone()).await? {
				tracing::debug!("image key did not match");
				return Err(NoteError::InvalidImageKey);
			}
		}

		let owner_display_name = self.display_name(&note.owner_id).await?;
		let capability = self.read_capability(&note).await?;
		self.record_access(&note, caller.map(|c| c.user_id));

		Ok(NoteView {
			note,
			owner_display_name,
			capability,
		})
	}

	fn record_access(&self, note: &Note, accessed_by: Option<UserId>) {
		let events = Arc::clone(&self.access_events);
		let event = AccessEvent::new(note.id, accessed_by, note.visibility);
		tokio::spawn(async move {
			if let Err(e) = events.record_access(&event).await {
				tracing::warn!(note_id = %event.note_id, error = %e, "failed to record access event");
			}
		});
	}

	/// The caller's notes, newest first.
	#[tracing::instrument(skip(self, owner), fields(owner_id = %owner.user_id))]
	pub async fn list_owned(&self, owner: &Identity, visibility: Option<Visibility>) -> Result<Vec<NoteView>> {
		let notes = self
			.notes
			.list_notes_for_owner(&owner.user_id, visibility)
			.await?;
		let names = HashMap::from([(owner.user_id, owner.display_name.clone())]);
		self.with_capabilities(notes, &names).await
	}

	/// The caller's notes split by visibility.
	pub async fn dashboard(&self, owner: &Identity) -> Result<Dashboard> {
		let (private_notes, public_notes) = self
			.list_owned(owner, None)
			.await?
			.into_iter()
			.partition(|view| view.note.visibility.is_private());
		Ok(Dashboard {
			public_notes,
			private_notes,
		})
	}

	/// Newest public notes from every owner.
	#[tracing::instrument(skip(self))]
	pub async fn public_feed(&self) -> Result<Vec<NoteView>> {
		let notes = self.notes.list_public_notes(PUBLIC_FEED_LIMIT).await?;

		let mut names = HashMap::new();
		for note in &notes {
			if !names.contains_key(&note.owner_id) {
				let name = self.display_name(&note.owner_id).await?;
				names.insert(note.owner_id, name);
			}
		}
		self.with_capabilities(notes, &names).await
	}

	/// Delete a note. Only its owner may.
	#[tracing::instrument(skip(self, caller), fields(%note_id, caller_id = %caller.user_id))]
	pub async fn delete(&self, caller: &Identity, note_id: &NoteId) -> Result<()> {
		let note = self
			.notes
			.get_note(note_id)
			.await?
			.ok_or(NoteError::NotFound)?;

		if note.owner_id != caller.user_id {
			tracing::warn!(owner_id = %note.owner_id, "delete denied: not_owner");
			return Err(NoteError::NotOwner);
		}

		if !self.notes.delete_note(note_id).await? {
			return Err(NoteError::NotFound);
		}
		tracing::info!("note deleted");
		Ok(())
	}

	async fn display_name(&self, user_id: &UserId) -> Result<String> {
		self
			.users
			.get_user_by_id(user_id)
			.await?
			.map(|user| user.display_name)
			.ok_or_else(|| DbError::NotFound(format!("user {user_id}")).into())
	}

	async fn read_capability(&self, note: &Note) -> Result<Capability> {
		let request = CapabilityRequest::get(note.object_key.clone(), self.capability_ttl);
		Ok(self.issuer.issue(request).await?)
	}

	async fn with_capabilities(
		&self,
		notes: Vec<Note>,
		owner_names: &HashMap<UserId, String>,
	) -> Result<Vec<NoteView>> {
		try_join_all(notes.into_iter().map(|note| async move {
			let capability = self.read_capability(&note).await?;
			let owner_display_name = owner_names
				.get(&note.owner_id)
				.cloned()
				.unwrap_or_default();
			Ok::<_, NoteError>(NoteView {
				note,
				owner_display_name,
				capability,
			})
		}))
		.await
	}
}
