// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `/api/chat` handlers over [`teap_chat::ChatService`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use super::{body_or_default, present, Payload};
use crate::api::AppState;
use crate::error::ApiError;
use crate::response::message;

#[derive(Debug, Default, Deserialize)]
pub struct CreateChatUserRequest {
	pub username: Option<String>,
	pub password: Option<String>,
	pub email: Option<String>,
	pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateChannelRequest {
	pub channel_name: Option<String>,
}

fn outcome_status(success: bool) -> StatusCode {
	if success {
		StatusCode::CREATED
	} else {
		StatusCode::BAD_GATEWAY
	}
}

/// POST /api/chat/users
#[instrument(skip(state, payload))]
pub async fn create_chat_user(
	State(state): State<AppState>,
	payload: Payload<CreateChatUserRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let (Some(username), Some(password), Some(email), Some(name)) = (
		present(&body.username),
		present(&body.password),
		present(&body.email),
		present(&body.name),
	) else {
		return Ok(message(
			StatusCode::BAD_REQUEST,
			"username, password, email, name fields are required",
		));
	};

	let outcome = state
		.chat()?
		.create_user(username, password, email, name)
		.await;
	Ok((outcome_status(outcome.success), Json(outcome)).into_response())
}

/// POST /api/chat/channels
#[instrument(skip(state, payload))]
pub async fn create_chat_channel(
	State(state): State<AppState>,
	payload: Payload<CreateChannelRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let Some(channel_name) = present(&body.channel_name) else {
		return Ok(message(StatusCode::BAD_REQUEST, "channel_name is required"));
	};

	let outcome = state.chat()?.create_channel(channel_name).await;
	Ok((outcome_status(outcome.success), Json(outcome)).into_response())
}

/// GET /api/chat/users/{username}
#[instrument(skip(state))]
pub async fn get_chat_user(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> Result<Response, ApiError> {
	match state.chat()?.get_user_by_username(&username).await {
		Some(user) => Ok(Json(user).into_response()),
		None => Ok(message(StatusCode::NOT_FOUND, "Chat user not found")),
	}
}

/// GET /api/chat/channels/{name}
#[instrument(skip(state))]
pub async fn get_chat_channel(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Response, ApiError> {
	match state.chat()?.get_channel_by_name(&name).await {
		Some(channel) => Ok(Json(channel).into_response()),
		None => Ok(message(StatusCode::NOT_FOUND, "Chat channel not found")),
	}
}

/// DELETE /api/chat/users/{user_id} - the chat answer is passed through.
#[instrument(skip(state))]
pub async fn delete_chat_user(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
	let response = state.chat()?.delete_user(&user_id).await?;
	let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
	Ok((status, Json(response.body)).into_response())
}
