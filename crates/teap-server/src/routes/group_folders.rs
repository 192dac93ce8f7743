// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use teap_server_audit::{AuditEvent, AuditEventKind};
use tracing::instrument;

use super::{body_or_default, Payload};
use crate::api::AppState;
use crate::error::ApiError;
use crate::provisioning::{self, GroupFolderSaga, ProvisionOutcome, SagaStep};
use crate::response::message;

#[derive(Debug, Default, Deserialize)]
pub struct GroupWithFolderRequest {
	pub group_name: Option<String>,
	pub group_type: Option<String>,
}

/// POST /api/groups-with-folders
#[instrument(skip(state, payload))]
pub async fn create_group_with_folder(
	State(state): State<AppState>,
	payload: Payload<GroupWithFolderRequest>,
) -> Result<Response, ApiError> {
	let body = body_or_default(payload);
	let group_name = body.group_name.unwrap_or_default();
	let group_type = body.group_type.unwrap_or_default();

	if let Err(e) = provisioning::validate(&group_name, &group_type) {
		return Ok(message(StatusCode::BAD_REQUEST, e.to_string()));
	}

	let groupware = state.groupware()?;
	if groupware.get_group(&group_name).await?.is_ok {
		return Ok(message(
			StatusCode::BAD_REQUEST,
			"Group with this name already exists",
		));
	}

	let outcome = GroupFolderSaga::new(groupware, &group_name, &group_type)
		.run()
		.await;

	let mut audit = json!({ "group_name": group_name, "group_type": group_type });
	let (success, response) = match outcome {
		ProvisionOutcome::Created { steps } => {
			audit["completed"] = json!(steps.iter().map(SagaStep::name).collect::<Vec<_>>());
			(
				true,
				message(
					StatusCode::CREATED,
					"Group with group folder successfully created",
				),
			)
		}
		ProvisionOutcome::GroupCreationFailed { reason } => {
			audit["reason"] = json!(reason);
			(
				false,
				message(
					StatusCode::BAD_REQUEST,
					"Something went wrong during group creation",
				),
			)
		}
		ProvisionOutcome::FolderCreationFailed(rollback) => {
			audit["rollback"] = serde_json::to_value(&rollback)?;
			(
				false,
				(
					StatusCode::BAD_REQUEST,
					Json(json!({
						"message": "Something went wrong during group folder creation",
						"failed_step": rollback.failed_step,
						"rolled_back": rollback.rolled_back,
						"compensation_failed": rollback.compensation_failed,
					})),
				)
					.into_response(),
			)
		}
	};

	state
		.audit
		.log(
			AuditEvent::builder(AuditEventKind::GroupFolderProvisioned)
				.success(success)
				.payload(audit)
				.build(),
		)
		.await;

	Ok(response)
}
