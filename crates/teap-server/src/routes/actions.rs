// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use teap_server_audit::AuditEventKind;
use teap_server_db::AuditRecord;

use crate::api::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ActionsQuery {
	pub event: Option<String>,
	pub limit: Option<i64>,
}

/// GET /api/actions - audit log, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_actions(
	State(state): State<AppState>,
	Query(query): Query<ActionsQuery>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
	let kind = match query.event.as_deref().filter(|e| !e.is_empty()) {
		Some(event) => Some(
			event
				.parse::<AuditEventKind>()
				.map_err(|e| ApiError::BadRequest(e.to_string()))?,
		),
		None => None,
	};

	let records = state.audit_repo.list(kind, query.limit).await?;
	Ok(Json(records))
}
