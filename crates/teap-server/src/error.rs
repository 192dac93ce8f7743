// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use teap_chat::ChatError;
use teap_directory::{DirectoryError, RecordError};
use teap_groupware::GroupwareError;
use teap_server_db::DbError;

use crate::response::message;

/// Errors surfaced by handlers, rendered as `{"message": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("{0}")]
	BadRequest(String),
	#[error("{0}")]
	NotFound(String),
	#[error("{0}")]
	Conflict(String),
	#[error("{0}")]
	Upstream(String),
	#[error("{0}")]
	Unavailable(String),
	#[error("{0}")]
	Internal(String),
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::Conflict(_) => StatusCode::CONFLICT,
			ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
			ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<DirectoryError> for ApiError {
	fn from(e: DirectoryError) -> Self {
		match e {
			DirectoryError::NotFound(_) => ApiError::NotFound(e.to_string()),
			DirectoryError::MultipleFound(_) => ApiError::Conflict(e.to_string()),
			DirectoryError::ConstraintViolation(msg) => ApiError::BadRequest(msg),
			DirectoryError::Connection(_) | DirectoryError::Upstream(_) => {
				ApiError::Upstream(e.to_string())
			}
		}
	}
}

impl From<RecordError> for ApiError {
	fn from(e: RecordError) -> Self {
		ApiError::Upstream(format!("Unexpected directory data: {e}"))
	}
}

impl From<GroupwareError> for ApiError {
	fn from(e: GroupwareError) -> Self {
		ApiError::Upstream(format!("Groupware request failed: {e}"))
	}
}

impl From<ChatError> for ApiError {
	fn from(e: ChatError) -> Self {
		ApiError::Upstream(format!("Chat request failed: {e}"))
	}
}

impl From<DbError> for ApiError {
	fn from(e: DbError) -> Self {
		ApiError::Internal(e.to_string())
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(e: serde_json::Error) -> Self {
		ApiError::Internal(e.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(status = status.as_u16(), error = %self, "request failed");
		}
		message(status, self.to_string())
	}
}
