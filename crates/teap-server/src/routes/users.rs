// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `/api/users` handlers. Reads go to the directory; account state changes go
//! to the groupware.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use teap_common_config::SecretString;
use teap_directory::{DirectoryEntry, DirectoryError, NewDirectoryUser};
use teap_server_audit::{AuditEvent, AuditEventKind};
use tracing::{instrument, warn};

use super::{body_or_default, present, Payload};
use crate::api::AppState;
use crate::error::ApiError;
use crate::response::{empty, envelope, message};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
	pub username: Option<String>,
	pub password: Option<String>,
	pub name: Option<String>,
	pub surname: Option<String>,
	/// Group fqdns to join after the user is created.
	#[serde(default)]
	pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMembershipResult {
	pub group: String,
	pub added: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditUserRequest {
	pub param: Option<String>,
	pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MembershipRequest {
	pub fqdn: Option<String>,
}

/// GET /api/users/
#[instrument(skip(state))]
pub async fn list_users(
	State(state): State<AppState>,
) -> Result<Json<Vec<DirectoryEntry>>, ApiError> {
	let users = state.directory()?.get_users().await?;
	Ok(Json(users))
}

/// POST /api/users/
///
/// Group memberships are best effort: each requested group is reported with
/// its own outcome and none of them fails the request.
#[instrument(skip(state, payload))]
pub async fn create_user(
	State(state): State<AppState>,
	payload: Payload<CreateUserRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let (Some(username), Some(password), Some(name), Some(surname)) = (
		present(&body.username),
		present(&body.password),
		present(&body.name),
		present(&body.surname),
	) else {
		return Ok(message(
			StatusCode::BAD_REQUEST,
			"username, password, name, surname fields are required",
		));
	};

	let directory = state.directory()?;
	let new_user = NewDirectoryUser {
		uid: username.to_string(),
		given_name: name.to_string(),
		surname: surname.to_string(),
		password: SecretString::new(password.to_string()),
	};
	let audit_data = json!({
		"username": username,
		"name": name,
		"surname": surname,
		"groups": body.groups,
	});

	if let Err(e) = directory.add_user(&new_user).await {
		state
			.audit
			.log(
				AuditEvent::builder(AuditEventKind::DirectoryUserCreated)
					.success(false)
					.payload(audit_data)
					.message(e.to_string())
					.build(),
			)
			.await;
		return match e {
			DirectoryError::ConstraintViolation(reason) => Ok(message(
				StatusCode::OK,
				format!("Failed to create user. {reason}"),
			)),
			other => Err(other.into()),
		};
	}

	let mut groups = Vec::with_capacity(body.groups.len());
	for group in &body.groups {
		let result = match directory.make_uid_member_of(username, group).await {
			Ok(()) => GroupMembershipResult {
				group: group.clone(),
				added: true,
				error: None,
			},
			Err(e) => {
				warn!(username, group = %group, error = %e, "failed to add new user to group");
				GroupMembershipResult {
					group: group.clone(),
					added: false,
					error: Some(e.to_string()),
				}
			}
		};
		groups.push(result);
	}

	let mut audit_data = audit_data;
	audit_data["memberships"] = serde_json::to_value(&groups)?;
	state
		.audit
		.record(AuditEventKind::DirectoryUserCreated, true, audit_data)
		.await;

	Ok(Json(json!({ "status": true, "groups": groups })).into_response())
}

/// GET /api/users/{username} - the entry plus the groups it belongs to.
#[instrument(skip(state))]
pub async fn retrieve_user(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> Result<Response, ApiError> {
	let directory = state.directory()?;
	let entry = match directory.get_user(&username).await {
		Ok(entry) => entry,
		Err(DirectoryError::NotFound(_)) => {
			return Ok(message(StatusCode::NOT_FOUND, "User does not exist"))
		}
		Err(DirectoryError::MultipleFound(_)) => {
			return Ok(message(StatusCode::CONFLICT, "More than 1 user found"))
		}
		Err(e) => return Err(e.into()),
	};

	let groups = directory.get_user_groups(&username).await?;
	let mut body = serde_json::to_value(&entry)?;
	if let Value::Object(map) = &mut body {
		map.insert("groups".to_string(), serde_json::to_value(&groups)?);
	}
	Ok(Json(body).into_response())
}

/// DELETE /api/users/{username}
#[instrument(skip(state))]
pub async fn delete_user(
	State(state): State<AppState>,
	Path(username): Path<String>,
) -> Result<Response, ApiError> {
	let response = state.groupware()?.delete_user(&username).await?;
	Ok(envelope(StatusCode::OK, &response))
}

/// PATCH /api/users/{username}/{action} - `enable` or `disable`.
#[instrument(skip(state))]
pub async fn set_user_state(
	State(state): State<AppState>,
	Path((username, action)): Path<(String, String)>,
) -> Result<Response, ApiError> {
	let groupware = state.groupware()?;
	let response = match action.as_str() {
		"enable" => groupware.enable_user(&username).await?,
		"disable" => groupware.disable_user(&username).await?,
		_ => return Ok(empty(StatusCode::NOT_FOUND)),
	};
	Ok(envelope(StatusCode::OK, &response))
}

/// PATCH /api/users/{username} with `{param, value}`.
#[instrument(skip(state, payload))]
pub async fn edit_user(
	State(state): State<AppState>,
	Path(username): Path<String>,
	payload: Payload<EditUserRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let (Some(param), Some(value)) = (present(&body.param), present(&body.value)) else {
		return Ok(empty(StatusCode::BAD_REQUEST));
	};

	let response = state
		.groupware()?
		.edit_user(&username, param, value)
		.await?;
	Ok(envelope(StatusCode::OK, &response))
}

/// POST /api/users/{username}/groups/
#[instrument(skip(state, payload))]
pub async fn add_membership(
	State(state): State<AppState>,
	Path(username): Path<String>,
	payload: Payload<MembershipRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let Some(fqdn) = present(&body.fqdn) else {
		return Ok(message(StatusCode::BAD_REQUEST, "fqdn is required parameter"));
	};

	match state.directory()?.make_uid_member_of(&username, fqdn).await {
		Ok(()) => Ok(message(StatusCode::OK, "Success")),
		Err(DirectoryError::ConstraintViolation(reason)) => {
			Ok(message(StatusCode::NOT_FOUND, reason))
		}
		Err(e) => Err(e.into()),
	}
}

/// DELETE /api/users/{username}/groups/
///
/// Refusals answer 400 here but 404 when adding.
#[instrument(skip(state, payload))]
pub async fn remove_membership(
	State(state): State<AppState>,
	Path(username): Path<String>,
	payload: Payload<MembershipRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let Some(fqdn) = present(&body.fqdn) else {
		return Ok(message(StatusCode::BAD_REQUEST, "fqdn is a required parameter"));
	};

	match state.directory()?.remove_uid_member_of(&username, fqdn).await {
		Ok(()) => Ok(message(StatusCode::ACCEPTED, "Success")),
		Err(DirectoryError::ConstraintViolation(reason)) => Ok(message(
			StatusCode::BAD_REQUEST,
			format!("Failed to delete. {reason}"),
		)),
		Err(e) => Err(e.into()),
	}
}
