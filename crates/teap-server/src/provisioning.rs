// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group plus shared-folder provisioning.
//!
//! A run creates the group, makes sure the folder for its type exists, creates
//! `<type>/<group>` and grants the group access to both folders. Every
//! completed step is recorded; when a later step fails the recorded steps are
//! undone in reverse order.

use serde::Serialize;
use teap_groupware::{GroupwareClient, GroupwareError, GroupwareResponse};
use tracing::{error, info, instrument, warn};

pub const ALLOWED_GROUP_TYPES: &[&str] = &["divisions", "countries", "other"];

/// Rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("group_name, group_type are required parameters")]
	MissingFields,
	#[error("Not allowed group type")]
	GroupType,
	#[error("Division group name must start with \"Division\"")]
	DivisionName,
	#[error("Country group name must start with \"Country\"")]
	CountryName,
}

/// Check the type and the naming convention that goes with it.
pub fn validate(group_name: &str, group_type: &str) -> Result<(), ValidationError> {
	if group_name.is_empty() || group_type.is_empty() {
		return Err(ValidationError::MissingFields);
	}

	let group_type = group_type.to_lowercase();
	if !ALLOWED_GROUP_TYPES.contains(&group_type.as_str()) {
		return Err(ValidationError::GroupType);
	}

	let name = group_name.to_lowercase();
	match group_type.as_str() {
		"divisions" if !name.starts_with("division") => Err(ValidationError::DivisionName),
		"countries" if !name.starts_with("country") => Err(ValidationError::CountryName),
		_ => Ok(()),
	}
}

/// A completed, reversible step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaStep {
	GroupCreated,
	TypeFolderCreated { folder_id: String },
	TypeFolderAccessGranted { folder_id: String },
	GroupFolderCreated { folder_id: String },
	GroupFolderAccessGranted { folder_id: String },
}

impl SagaStep {
	pub fn name(&self) -> &'static str {
		match self {
			SagaStep::GroupCreated => "group_created",
			SagaStep::TypeFolderCreated { .. } => "type_folder_created",
			SagaStep::TypeFolderAccessGranted { .. } => "type_folder_access_granted",
			SagaStep::GroupFolderCreated { .. } => "group_folder_created",
			SagaStep::GroupFolderAccessGranted { .. } => "group_folder_access_granted",
		}
	}
}

/// The step that was being attempted when a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStep {
	CreateGroup,
	ListGroupFolders,
	CreateTypeFolder,
	GrantTypeFolderAccess,
	CreateGroupFolder,
	GrantGroupFolderAccess,
}

/// What happened when a run failed after the group existed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rollback {
	pub failed_step: FailedStep,
	pub reason: String,
	/// Names of steps that were undone, most recent first.
	pub rolled_back: Vec<&'static str>,
	/// Names of steps whose compensation failed.
	pub compensation_failed: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
	Created { steps: Vec<SagaStep> },
	/// The group could not be created; nothing was written.
	GroupCreationFailed { reason: String },
	/// A folder step failed and the run was rolled back.
	FolderCreationFailed(Rollback),
}

pub struct GroupFolderSaga<'a> {
	groupware: &'a dyn GroupwareClient,
	group_name: String,
	group_type: String,
	completed: Vec<SagaStep>,
}

struct StepFailure {
	step: FailedStep,
	reason: String,
}

fn check(
	step: FailedStep,
	result: Result<GroupwareResponse, GroupwareError>,
) -> Result<GroupwareResponse, StepFailure> {
	match result {
		Ok(response) if response.is_ok => Ok(response),
		Ok(response) => Err(StepFailure {
			step,
			reason: format!("status {}: {}", response.status_code, response.message),
		}),
		Err(e) => Err(StepFailure {
			step,
			reason: e.to_string(),
		}),
	}
}

fn created_folder_id(step: FailedStep, response: &GroupwareResponse) -> Result<String, StepFailure> {
	response.data_id().ok_or_else(|| StepFailure {
		step,
		reason: "folder created without an id".to_string(),
	})
}

impl<'a> GroupFolderSaga<'a> {
	/// `group_type` is used as given for the mount point.
	pub fn new(groupware: &'a dyn GroupwareClient, group_name: &str, group_type: &str) -> Self {
		Self {
			groupware,
			group_name: group_name.to_string(),
			group_type: group_type.to_string(),
			completed: Vec::new(),
		}
	}

	#[instrument(skip(self), fields(group = %self.group_name, group_type = %self.group_type))]
	pub async fn run(mut self) -> ProvisionOutcome {
		if let Err(failure) = check(
			FailedStep::CreateGroup,
			self.groupware.add_group(&self.group_name).await,
		) {
			warn!(reason = %failure.reason, "group creation failed");
			return ProvisionOutcome::GroupCreationFailed {
				reason: failure.reason,
			};
		}
		self.completed.push(SagaStep::GroupCreated);

		match self.provision_folders().await {
			Ok(()) => {
				info!("group with folder provisioned");
				ProvisionOutcome::Created {
					steps: self.completed,
				}
			}
			Err(failure) => {
				error!(step = ?failure.step, reason = %failure.reason, "folder provisioning failed, rolling back");
				ProvisionOutcome::FolderCreationFailed(self.roll_back(failure).await)
			}
		}
	}

	async fn provision_folders(&mut self) -> Result<(), StepFailure> {
		let folders = check(
			FailedStep::ListGroupFolders,
			self.groupware.get_group_folders().await,
		)?;

		let type_folder_id = match folders.folder_id_for_mount_point(&self.group_type) {
			Some(id) => id,
			None => {
				let created = check(
					FailedStep::CreateTypeFolder,
					self.groupware.create_group_folder(&self.group_type).await,
				)?;
				let folder_id = created_folder_id(FailedStep::CreateTypeFolder, &created)?;
				self.completed.push(SagaStep::TypeFolderCreated {
					folder_id: folder_id.clone(),
				});
				folder_id
			}
		};

		check(
			FailedStep::GrantTypeFolderAccess,
			self.groupware
				.grant_access_to_group_folder(&type_folder_id, &self.group_name)
				.await,
		)?;
		self.completed.push(SagaStep::TypeFolderAccessGranted {
			folder_id: type_folder_id,
		});

		let path = format!("{}/{}", self.group_type, self.group_name);
		let created = check(
			FailedStep::CreateGroupFolder,
			self.groupware.create_group_folder(&path).await,
		)?;
		let folder_id = created_folder_id(FailedStep::CreateGroupFolder, &created)?;
		self.completed.push(SagaStep::GroupFolderCreated {
			folder_id: folder_id.clone(),
		});

		check(
			FailedStep::GrantGroupFolderAccess,
			self.groupware
				.grant_access_to_group_folder(&folder_id, &self.group_name)
				.await,
		)?;
		self.completed.push(SagaStep::GroupFolderAccessGranted { folder_id });

		Ok(())
	}

	async fn compensate(&self, step: &SagaStep) -> Result<GroupwareResponse, GroupwareError> {
		match step {
			SagaStep::GroupCreated => self.groupware.delete_group(&self.group_name).await,
			SagaStep::TypeFolderCreated { folder_id } | SagaStep::GroupFolderCreated { folder_id } => {
				self.groupware.delete_group_folder(folder_id).await
			}
			SagaStep::TypeFolderAccessGranted { folder_id }
			| SagaStep::GroupFolderAccessGranted { folder_id } => {
				self.groupware
					.revoke_access_to_group_folder(folder_id, &self.group_name)
					.await
			}
		}
	}

	/// Undo every completed step, most recent first. A failed compensation is
	/// logged and the rest still run.
	async fn roll_back(mut self, failure: StepFailure) -> Rollback {
		let mut rolled_back = Vec::new();
		let mut compensation_failed = Vec::new();

		while let Some(step) = self.completed.pop() {
			match self.compensate(&step).await {
				Ok(response) if response.is_ok => rolled_back.push(step.name()),
				Ok(response) => {
					warn!(
						step = step.name(),
						status = response.status_code,
						message = %response.message,
						"compensation refused"
					);
					compensation_failed.push(step.name());
				}
				Err(e) => {
					warn!(step = step.name(), error = %e, "compensation failed");
					compensation_failed.push(step.name());
				}
			}
		}

		Rollback {
			failed_step: failure.step,
			reason: failure.reason,
			rolled_back,
			compensation_failed,
		}
	}
}
