// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

pub mod actions;
pub mod chat;
pub mod group_folders;
pub mod groups;
pub mod health;
pub mod org_units;
pub mod subadmins;
pub mod users;

/// JSON body that may be missing or malformed. Handlers validate the fields
/// themselves so they can answer with their own messages.
pub type Payload<T> = Result<Json<T>, JsonRejection>;

pub(crate) fn body_or_default<T: Default>(payload: Payload<T>) -> T {
	match payload {
		Ok(Json(body)) => body,
		Err(rejection) => {
			tracing::debug!(error = %rejection, "request body rejected, treating as empty");
			T::default()
		}
	}
}

/// A required string field: absent and empty both count as missing.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|v| !v.is_empty())
}
