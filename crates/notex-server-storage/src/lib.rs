// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Object storage capabilities for NoteX.
//!
//! The server never touches image bytes. It hands out pre-signed URLs
//! ([`Capability`]) that let the holder `PUT` or `GET` one object until the
//! URL expires. [`CapabilityIssuer`] is the seam; [`S3Presigner`] is the
//! production implementation and [`testing`] has stand-ins.

pub mod capability;
pub mod error;
pub mod presign;
pub mod testing;

pub use capability::{
	Capability, CapabilityIssuer, CapabilityMethod, CapabilityRequest, MAX_EXPIRY, MAX_KEY_LEN,
};
pub use error::StorageError;
pub use presign::{uri_encode, S3Presigner, S3PresignerConfig};
