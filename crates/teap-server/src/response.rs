// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response bodies shared by the handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use teap_groupware::GroupwareResponse;

/// `{"message": "..."}` with the given status.
pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
	(status, Json(json!({ "message": message.into() }))).into_response()
}

/// `{}` with the given status.
pub fn empty(status: StatusCode) -> Response {
	(status, Json(json!({}))).into_response()
}

/// Groupware result as `{"status", "message", "data"}`.
pub fn envelope(status: StatusCode, response: &GroupwareResponse) -> Response {
	(status, Json(response.envelope())).into_response()
}
