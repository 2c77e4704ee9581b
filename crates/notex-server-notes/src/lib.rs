// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Note images: who may upload, read and delete them, and the storage
//! capabilities handed out when they may.

pub mod error;
pub mod key;
pub mod service;
pub mod upload;

pub use error::{NoteError, Result};
pub use key::{object_key, object_name};
pub use service::{Dashboard, NoteService, NoteView, UploadGrant, PUBLIC_FEED_LIMIT};
pub use upload::{UploadRequest, ValidUpload, MAX_NAME_LEN};
