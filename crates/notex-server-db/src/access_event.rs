// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only log of read-capability issuances.

use async_trait::async_trait;
use notex_server_auth::{AccessEventId, NoteId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{format_timestamp, parse_tag, parse_timestamp, parse_uuid, AccessEvent};

#[async_trait]
pub trait AccessEventStore: Send + Sync {
	async fn record_access(&self, event: &AccessEvent) -> Result<(), DbError>;
	async fn list_access_events(&self, note_id: &NoteId) -> Result<Vec<AccessEvent>, DbError>;
}

#[async_trait]
impl AccessEventStore for AccessEventRepository {
	async fn record_access(&self, event: &AccessEvent) -> Result<(), DbError> {
		self.record_access(event).await
	}

	async fn list_access_events(&self, note_id: &NoteId) -> Result<Vec<AccessEvent>, DbError> {
		self.list_access_events(note_id).await
	}
}

#[derive(Clone)]
pub struct AccessEventRepository {
	pool: SqlitePool,
}

impl AccessEventRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, event), fields(note_id = %event.note_id))]
	pub async fn record_access(&self, event: &AccessEvent) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO access_events (id, note_id, accessed_by, visibility, accessed_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(event.id.to_string())
		.bind(event.note_id.to_string())
		.bind(event.accessed_by.map(|id| id.to_string()))
		.bind(event.visibility.as_str())
		.bind(format_timestamp(&event.accessed_at))
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	/// Events for one note, oldest first.
	#[tracing::instrument(skip(self), fields(note_id = %note_id))]
	pub async fn list_access_events(&self, note_id: &NoteId) -> Result<Vec<AccessEvent>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, note_id, accessed_by, visibility, accessed_at
			FROM access_events
			WHERE note_id = ?
			ORDER BY accessed_at ASC
			"#,
		)
		.bind(note_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_access_event_row).collect()
	}
}

fn parse_access_event_row(row: &sqlx::sqlite::SqliteRow) -> Result<AccessEvent, DbError> {
	let id: String = row.get("id");
	let note_id: String = row.get("note_id");
	let accessed_by: Option<String> = row.get("accessed_by");
	let visibility: String = row.get("visibility");
	let accessed_at: String = row.get("accessed_at");

	Ok(AccessEvent {
		id: AccessEventId::new(parse_uuid(&id, "access event id")?),
		note_id: NoteId::new(parse_uuid(&note_id, "note_id")?),
		accessed_by: accessed_by
			.map(|s| parse_uuid(&s, "accessed_by").map(UserId::new))
			.transpose()?,
		visibility: parse_tag(&visibility, "visibility")?,
		accessed_at: parse_timestamp(&accessed_at, "accessed_at")?,
	})
}
