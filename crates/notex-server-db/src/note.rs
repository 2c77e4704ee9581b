// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note repository for database operations.

use async_trait::async_trait;
use notex_server_auth::{NoteId, UserId, Visibility};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{format_timestamp, parse_tag, parse_timestamp, parse_uuid, Note};

#[async_trait]
pub trait NoteStore: Send + Sync {
	async fn create_note(&self, note: &Note) -> Result<(), DbError>;
	async fn get_note(&self, id: &NoteId) -> Result<Option<Note>, DbError>;
	async fn delete_note(&self, id: &NoteId) -> Result<bool, DbError>;
	async fn list_notes_for_owner(
		&self,
		owner_id: &UserId,
		visibility: Option<Visibility>,
	) -> Result<Vec<Note>, DbError>;
	async fn list_public_notes(&self, limit: i64) -> Result<Vec<Note>, DbError>;
}

#[async_trait]
impl NoteStore for NoteRepository {
	async fn create_note(&self, note: &Note) -> Result<(), DbError> {
		self.create_note(note).await
	}

	async fn get_note(&self, id: &NoteId) -> Result<Option<Note>, DbError> {
		self.get_note(id).await
	}

	async fn delete_note(&self, id: &NoteId) -> Result<bool, DbError> {
		self.delete_note(id).await
	}

	async fn list_notes_for_owner(
		&self,
		owner_id: &UserId,
		visibility: Option<Visibility>,
	) -> Result<Vec<Note>, DbError> {
		self.list_notes_for_owner(owner_id, visibility).await
	}

	async fn list_public_notes(&self, limit: i64) -> Result<Vec<Note>, DbError> {
		self.list_public_notes(limit).await
	}
}

/// Repository for note records.
///
/// The image-key hash is stored but never leaves this crate except inside
/// [`Note`], and no API type carries it.
#[derive(Clone)]
pub struct NoteRepository {
	pool: SqlitePool,
}

const NOTE_COLUMNS: &str =
	"id, owner_id, name, visibility, content_type, size, object_key, key_hash, created_at";

impl NoteRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, note), fields(note_id = %note.id, owner_id = %note.owner_id, visibility = %note.visibility))]
	pub async fn create_note(&self, note: &Note) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO notes (
				id, owner_id, name, visibility, content_type, size, object_key, key_hash, created_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(note.id.to_string())
		.bind(note.owner_id.to_string())
		.bind(&note.name)
		.bind(note.visibility.as_str())
		.bind(note.content_type.mime())
		.bind(note.size)
		.bind(&note.object_key)
		.bind(&note.key_hash)
		.bind(format_timestamp(&note.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "note"))?;

		tracing::debug!(note_id = %note.id, "note created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(note_id = %id))]
	pub async fn get_note(&self, id: &NoteId) -> Result<Option<Note>, DbError> {
		let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_note_row).transpose()
	}

	/// Delete a note. Its access events are kept.
	///
	/// # Returns
	/// `true` if a row was deleted.
	#[tracing::instrument(skip(self), fields(note_id = %id))]
	pub async fn delete_note(&self, id: &NoteId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM notes WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(note_id = %id, "note deleted");
		}
		Ok(deleted)
	}

	/// Notes owned by a user, newest first, optionally of one visibility.
	#[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
	pub async fn list_notes_for_owner(
		&self,
		owner_id: &UserId,
		visibility: Option<Visibility>,
	) -> Result<Vec<Note>, DbError> {
		let rows = match visibility {
			Some(visibility) => {
				sqlx::query(&format!(
					"SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = ? AND visibility = ? ORDER BY created_at DESC"
				))
				.bind(owner_id.to_string())
				.bind(visibility.as_str())
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(&format!(
					"SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = ? ORDER BY created_at DESC"
				))
				.bind(owner_id.to_string())
				.fetch_all(&self.pool)
				.await?
			}
		};

		let notes = rows
			.iter()
			.map(parse_note_row)
			.collect::<Result<Vec<_>, _>>()?;
		tracing::debug!(owner_id = %owner_id, count = notes.len(), "listed notes for owner");
		Ok(notes)
	}

	/// The newest public notes across all owners.
	#[tracing::instrument(skip(self))]
	pub async fn list_public_notes(&self, limit: i64) -> Result<Vec<Note>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {NOTE_COLUMNS} FROM notes WHERE visibility = 'public' ORDER BY created_at DESC LIMIT ?"
		))
		.bind(limit)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_note_row).collect()
	}
}

fn parse_note_row(row: &sqlx::sqlite::SqliteRow) -> Result<Note, DbError> {
	let id: String = row.get("id");
	let owner_id: String = row.get("owner_id");
	let visibility: String = row.get("visibility");
	let content_type: String = row.get("content_type");
	let created_at: String = row.get("created_at");

	Ok(Note {
		id: NoteId::new(parse_uuid(&id, "note id")?),
		owner_id: UserId::new(parse_uuid(&owner_id, "owner_id")?),
		name: row.get("name"),
		visibility: parse_tag(&visibility, "visibility")?,
		content_type: parse_tag(&content_type, "content_type")?,
		size: row.get("size"),
		object_key: row.get("object_key"),
		key_hash: row.get("key_hash"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
