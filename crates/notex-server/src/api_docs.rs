// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for notex-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NoteX Server API",
        version = "1.0.0",
        description = "Accounts, sessions and pre-signed storage capabilities for note images.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health checks"),
        (name = "auth", description = "Accounts, password login, Google sign-in and session checks"),
        (name = "notes", description = "Note image upload and read capabilities")
    ),
    paths(
        // Health endpoints
        crate::routes::health::health_check,
        // Auth endpoints
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::verify_session,
        crate::routes::auth::google_login,
        crate::routes::auth::google_callback,
        // Note endpoints
        crate::routes::notes::upload_note,
        crate::routes::notes::access_note,
        crate::routes::notes::public_feed,
        crate::routes::notes::list_mine,
        crate::routes::notes::dashboard,
        crate::routes::notes::delete_note,
    ),
    components(schemas(
        notex_server_api::HealthResponse,
        notex_server_api::ErrorResponse,
        notex_server_api::FieldErrorResponse,
        notex_server_api::SignupRequest,
        notex_server_api::AccountResponse,
        notex_server_api::LoginRequest,
        notex_server_api::LoginResponse,
        notex_server_api::SessionResponse,
        notex_server_api::MessageResponse,
        notex_server_api::UploadNoteRequest,
        notex_server_api::AccessNoteRequest,
        notex_server_api::CapabilityResponse,
        notex_server_api::OwnerResponse,
        notex_server_api::NoteResponse,
        notex_server_api::NoteGrantResponse,
        notex_server_api::NoteListResponse,
        notex_server_api::DashboardResponse,
    ))
)]
pub struct ApiDoc;
