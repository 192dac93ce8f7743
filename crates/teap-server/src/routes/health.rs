// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::api::AppState;

/// GET /health - 200 when the database and every audit sink answer, 503
/// otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match teap_server_db::ping(&state.pool).await {
		Ok(()) => "ok",
		Err(e) => {
			tracing::error!(error = %e, "database health check failed");
			"error"
		}
	};
	let audit = match state.audit.health_check().await {
		Ok(()) => "ok",
		Err(e) => {
			tracing::error!(error = %e, "audit health check failed");
			"error"
		}
	};

	let (status, label) = if database == "ok" && audit == "ok" {
		(StatusCode::OK, "ok")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
	};
	(
		status,
		Json(json!({"status": label, "database": database, "audit": audit})),
	)
}
