// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tracing::instrument;

use super::{body_or_default, present, Payload};
use crate::api::AppState;
use crate::error::ApiError;
use crate::response::{envelope, message};

#[derive(Debug, Default, Deserialize)]
pub struct SubadminRequest {
	pub username: Option<String>,
}

/// GET /api/groups/{group_name}/subadmins
#[instrument(skip(state))]
pub async fn list_subadmins(
	State(state): State<AppState>,
	Path(group_name): Path<String>,
) -> Result<Response, ApiError> {
	let response = state.groupware()?.get_subadmins(&group_name).await?;
	Ok(envelope(StatusCode::OK, &response))
}

/// POST /api/groups/{group_name}/subadmins
#[instrument(skip(state, payload))]
pub async fn create_subadmin(
	State(state): State<AppState>,
	Path(group_name): Path<String>,
	payload: Payload<SubadminRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let Some(username) = present(&body.username) else {
		return Ok(message(StatusCode::BAD_REQUEST, "username is required"));
	};

	let groupware = state.groupware()?;
	if !groupware.get_group(&group_name).await?.is_ok {
		return Ok(message(StatusCode::NOT_FOUND, "group not found"));
	}
	let response = groupware.create_subadmin(username, &group_name).await?;
	Ok(envelope(StatusCode::CREATED, &response))
}

/// DELETE /api/groups/{group_name}/subadmins/{username}
#[instrument(skip(state))]
pub async fn remove_subadmin(
	State(state): State<AppState>,
	Path((group_name, username)): Path<(String, String)>,
) -> Result<Response, ApiError> {
	let groupware = state.groupware()?;
	if !groupware.get_group(&group_name).await?.is_ok {
		return Ok(message(StatusCode::NOT_FOUND, "group not found"));
	}
	let response = groupware.remove_subadmin(&username, &group_name).await?;
	Ok(envelope(StatusCode::ACCEPTED, &response))
}
