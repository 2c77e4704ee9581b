// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the NoteX HTTP API.
//!
//! Field names are camelCase on the wire. With the `openapi` feature every
//! type also derives `utoipa::ToSchema`.

pub mod auth;
pub mod error;
pub mod health;
pub mod notes;

pub use auth::{
	AccountResponse, LoginRequest, LoginResponse, MessageResponse, OAuthCallbackQuery,
	SessionResponse, SignupRequest,
};
pub use error::{ErrorResponse, FieldErrorResponse};
pub use health::HealthResponse;
pub use notes::{
	AccessNoteRequest, CapabilityResponse, DashboardResponse, ListNotesQuery, NoteGrantResponse,
	NoteListResponse, NoteResponse, OwnerResponse, UploadNoteRequest,
};
