// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `/api/groups` handlers. Lookups search the directory; creation and
//! deletion go to the groupware.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use teap_directory::{DirectoryEntry, DirectoryError, GroupFilter};
use tracing::{debug, instrument, warn};

use super::{body_or_default, present, Payload};
use crate::api::AppState;
use crate::error::ApiError;
use crate::response::{envelope, message};

#[derive(Debug, Deserialize)]
pub struct GroupsQuery {
	pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateGroupRequest {
	pub group_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkDeleteRequest {
	pub groups: Option<Vec<String>>,
	/// Only delete groups without members. Any truthy JSON value counts.
	#[serde(default)]
	pub empty: Option<Value>,
}

impl BulkDeleteRequest {
	fn only_empty(&self) -> bool {
		self.empty.as_ref().is_some_and(is_truthy)
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(fields) => !fields.is_empty(),
	}
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
	pub message: &'static str,
	pub deleted: Vec<String>,
	pub skipped: Vec<String>,
}

/// GET /api/groups/?query=q - `cn=<q>*` when a query is given.
#[instrument(skip(state))]
pub async fn list_groups(
	State(state): State<AppState>,
	Query(query): Query<GroupsQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, ApiError> {
	let filter = present(&query.query).map(|q| GroupFilter::CnPrefix(q.to_string()));
	let groups = state.directory()?.get_groups(filter).await?;
	Ok(Json(groups))
}

/// GET /api/groups/{group_name}
#[instrument(skip(state))]
pub async fn retrieve_group(
	State(state): State<AppState>,
	Path(group_name): Path<String>,
) -> Result<Response, ApiError> {
	let filter = GroupFilter::CnEquals(group_name.clone());
	let mut groups = match state.directory()?.get_groups(Some(filter)).await {
		Ok(groups) => groups,
		Err(DirectoryError::ConstraintViolation(reason)) => {
			return Ok(message(
				StatusCode::NOT_FOUND,
				format!("Group not found. {reason}"),
			))
		}
		Err(e) => return Err(e.into()),
	};

	match groups.len() {
		0 => Ok(message(StatusCode::NOT_FOUND, "Group not found.")),
		1 => Ok(Json(groups.remove(0)).into_response()),
		_ => Ok(message(StatusCode::CONFLICT, "More than 1 group found")),
	}
}

/// POST /api/groups/
#[instrument(skip(state, payload))]
pub async fn create_group(
	State(state): State<AppState>,
	payload: Payload<CreateGroupRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let Some(group_name) = present(&body.group_name) else {
		return Ok(message(StatusCode::BAD_REQUEST, "group_name is required"));
	};

	let response = state.groupware()?.add_group(group_name).await?;
	Ok(envelope(StatusCode::CREATED, &response))
}

/// DELETE /api/groups/{group_name}
#[instrument(skip(state))]
pub async fn delete_group(
	State(state): State<AppState>,
	Path(group_name): Path<String>,
) -> Result<Response, ApiError> {
	let response = state.groupware()?.delete_group(&group_name).await?;
	Ok(envelope(StatusCode::ACCEPTED, &response))
}

/// DELETE /api/groups/ with `{groups: [...], empty: bool}`.
///
/// Unknown groups are skipped. With `empty` set, groups that still have
/// members are skipped too.
#[instrument(skip(state, payload))]
pub async fn bulk_delete_groups(
	State(state): State<AppState>,
	payload: Payload<BulkDeleteRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let only_empty = body.only_empty();
	let Some(names) = body.groups else {
		return Ok(message(StatusCode::BAD_REQUEST, "groups is required"));
	};

	let groupware = state.groupware()?;
	let mut deleted = Vec::new();
	let mut skipped = Vec::new();

	for name in names {
		let group = groupware.get_group(&name).await?;
		if !group.is_ok {
			debug!(group = %name, "group not found, skipping");
			skipped.push(name);
			continue;
		}
		if only_empty && !group.group_users().is_empty() {
			debug!(group = %name, "group has members, skipping");
			skipped.push(name);
			continue;
		}

		let response = groupware.delete_group(&name).await?;
		if response.is_ok {
			deleted.push(name);
		} else {
			warn!(group = %name, status = response.status_code, "group deletion refused");
			skipped.push(name);
		}
	}

	Ok((
		StatusCode::ACCEPTED,
		Json(BulkDeleteResponse {
			message: "ok",
			deleted,
			skipped,
		}),
	)
		.into_response())
}
