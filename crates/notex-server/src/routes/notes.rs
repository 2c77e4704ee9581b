// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note image routes: upload and read capabilities, listings, deletion.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use notex_server_api::{
	AccessNoteRequest, DashboardResponse, ErrorResponse, ListNotesQuery, MessageResponse,
	NoteGrantResponse, NoteListResponse, UploadNoteRequest,
};
use notex_server_auth::{NoteId, ValidationErrors, Visibility};
use notex_server_notes::NoteError;

use crate::{
	api::AppState,
	auth_middleware::{OptionalAuth, RequireAuth},
	error::ServerError,
	extract::ApiJson,
};

/// A malformed id names no note.
fn parse_note_id(id: &str) -> Result<NoteId, ServerError> {
	id.parse().map_err(|_| NoteError::NotFound.into())
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = UploadNoteRequest,
    responses(
        (status = 201, description = "Note recorded; PUT the image to the capability URL", body = NoteGrantResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Capability issuance failed; nothing was recorded", body = ErrorResponse)
    ),
    tag = "notes"
)]
/// Records a note and returns an upload capability for its image.
#[tracing::instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn upload_note(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
	ApiJson(payload): ApiJson<UploadNoteRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let grant = state.notes.upload(&identity, payload.into()).await?;
	Ok((StatusCode::CREATED, Json(NoteGrantResponse::from(&grant))))
}

#[utoipa::path(
    post,
    path = "/api/notes/{id}/access",
    params(("id" = String, Path, description = "Note id")),
    request_body(content = AccessNoteRequest, description = "Optional; carries the image key for private notes"),
    responses(
        (status = 200, description = "Read capability and note metadata", body = NoteGrantResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 403, description = "image_key_required or invalid_image_key", body = ErrorResponse),
        (status = 404, description = "No note with this id", body = ErrorResponse)
    ),
    tag = "notes"
)]
/// Issues a read capability. Open to anonymous callers; private notes need
/// their image key.
#[tracing::instrument(skip(state, caller, body))]
pub async fn access_note(
	State(state): State<AppState>,
	OptionalAuth(caller): OptionalAuth,
	Path(id): Path<String>,
	body: Option<ApiJson<AccessNoteRequest>>,
) -> Result<Json<NoteGrantResponse>, ServerError> {
	let note_id = parse_note_id(&id)?;
	let image_key = body.and_then(|ApiJson(request)| request.image_key);

	let view = state
		.notes
		.request_read(caller.as_ref(), &note_id, image_key)
		.await?;
	Ok(Json(NoteGrantResponse::from(&view)))
}

#[utoipa::path(
    get,
    path = "/api/notes/public",
    responses(
        (status = 200, description = "Newest public notes with read capabilities", body = NoteListResponse)
    ),
    tag = "notes"
)]
#[tracing::instrument(skip(state))]
pub async fn public_feed(State(state): State<AppState>) -> Result<Json<NoteListResponse>, ServerError> {
	let views = state.notes.public_feed().await?;
	Ok(Json(NoteListResponse::from(views.as_slice())))
}

#[utoipa::path(
    get,
    path = "/api/notes/mine",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "The caller's notes, newest first", body = NoteListResponse),
        (status = 400, description = "Unknown visibility", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[tracing::instrument(skip(state, identity, query), fields(user_id = %identity.user_id))]
pub async fn list_mine(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
	Query(query): Query<ListNotesQuery>,
) -> Result<Json<NoteListResponse>, ServerError> {
	let visibility = query
		.visibility
		.as_deref()
		.map(str::parse::<Visibility>)
		.transpose()
		.map_err(|e| ValidationErrors::single("visibility", e.to_string()))?;

	let views = state.notes.list_owned(&identity, visibility).await?;
	Ok(Json(NoteListResponse::from(views.as_slice())))
}

#[utoipa::path(
    get,
    path = "/api/notes/dashboard",
    responses(
        (status = 200, description = "The caller's notes split by visibility", body = DashboardResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[tracing::instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn dashboard(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
) -> Result<Json<DashboardResponse>, ServerError> {
	let dashboard = state.notes.dashboard(&identity).await?;
	Ok(Json(DashboardResponse::from(&dashboard)))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 403, description = "Caller does not own the note", body = ErrorResponse),
        (status = 404, description = "No note with this id", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[tracing::instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn delete_note(
	State(state): State<AppState>,
	RequireAuth(identity): RequireAuth,
	Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
	let note_id = parse_note_id(&id)?;
	state.notes.delete(&identity, &note_id).await?;
	Ok(Json(MessageResponse::new("note deleted")))
}
