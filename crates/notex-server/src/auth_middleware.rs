// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] resolves whatever session tokens a request carries into an
//! [`AuthContext`] request extension. Handlers then use [`RequireAuth`] or
//! [`OptionalAuth`]:
//!
//! ```ignore
//! async fn mine(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.display_name)
//! }
//! ```
//!
//! Token values never reach the logs; a resolved request records only the
//! token kind and user id on the `auth_layer` span.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use notex_server_auth::{AuthError, Identity, RejectReason};
use notex_server_session::Resolution;
use tracing::instrument;

use crate::{api::AppState, error::ServerError};

/// Outcome of session resolution for the current request.
#[derive(Debug, Clone)]
pub struct AuthContext {
	pub resolution: Resolution,
}

impl AuthContext {
	pub fn rejected(reason: RejectReason) -> Self {
		Self {
			resolution: Resolution::Rejected(reason),
		}
	}

	pub fn identity(&self) -> Option<&Identity> {
		self.resolution.identity()
	}
}

#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let credentials = state.cookies.presented_credentials(request.headers());

	let resolution = match state.resolver.resolve(&credentials).await {
		Ok(resolution) => resolution,
		Err(e) => return ServerError::from(e).into_response(),
	};

	match &resolution {
		Resolution::Authenticated { identity, via } => {
			let span = tracing::Span::current();
			span.record("auth_method", via.as_str());
			span.record("user_id", tracing::field::display(&identity.user_id));
		}
		Resolution::Rejected(reason) => {
			tracing::debug!(reason = %reason, "request is unauthenticated");
		}
	}

	request.extensions_mut().insert(AuthContext { resolution });
	next.run(request).await
}

/// Extractor that rejects unauthenticated requests with the rejection reason.
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = ServerError;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let Some(context) = parts.extensions.get::<AuthContext>() else {
			return Err(ServerError::Unauthenticated);
		};

		match &context.resolution {
			Resolution::Authenticated { identity, .. } => Ok(RequireAuth(identity.clone())),
			Resolution::Rejected(reason) => {
				tracing::debug!(reason = %reason, "authentication required");
				Err(AuthError::Rejected(*reason).into())
			}
		}
	}
}

/// Extractor for routes open to anonymous callers.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(
			parts
				.extensions
				.get::<AuthContext>()
				.and_then(AuthContext::identity)
				.cloned(),
		))
	}
}
