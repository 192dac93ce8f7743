// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`GroupwareClient`] for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::client::GroupwareClient;
use crate::error::GroupwareError;
use crate::response::GroupwareResponse;

type Result<T> = std::result::Result<T, GroupwareError>;

#[derive(Debug, Clone)]
struct Folder {
	mount_point: String,
	groups: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct State {
	users: BTreeMap<String, bool>,
	groups: BTreeMap<String, Vec<String>>,
	subadmins: BTreeMap<String, BTreeSet<String>>,
	folders: BTreeMap<u64, Folder>,
	next_folder_id: u64,
	calls: Vec<String>,
	fail_group_creation: bool,
	fail_folder_creation: BTreeSet<String>,
	fail_grant: BTreeSet<String>,
	unreachable: bool,
}

/// Keeps users, groups, subadmins and group folders in memory.
///
/// Every call is appended to [`InMemoryGroupware::calls`] as
/// `"<operation> <args>"` so tests can assert the order of side effects.
/// Failures can be injected per mount point for folder creation and grants.
#[derive(Debug, Default)]
pub struct InMemoryGroupware {
	state: Mutex<State>,
}

impl InMemoryGroupware {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_user(self, user: &str) -> Self {
		self.state.lock().unwrap().users.insert(user.to_string(), true);
		self
	}

	pub fn with_group(self, group: &str, members: &[&str]) -> Self {
		self.state.lock().unwrap().groups.insert(
			group.to_string(),
			members.iter().map(|m| m.to_string()).collect(),
		);
		self
	}

	pub fn with_folder(self, mount_point: &str) -> Self {
		{
			let mut state = self.state.lock().unwrap();
			state.next_folder_id += 1;
			let id = state.next_folder_id;
			state.folders.insert(
				id,
				Folder {
					mount_point: mount_point.to_string(),
					groups: BTreeSet::new(),
				},
			);
		}
		self
	}

	/// `add_group` answers with OCS status 103.
	pub fn fail_group_creation(self) -> Self {
		self.state.lock().unwrap().fail_group_creation = true;
		self
	}

	/// `create_group_folder(mount_point)` answers with a failure.
	pub fn fail_folder_creation(self, mount_point: &str) -> Self {
		self.state
			.lock()
			.unwrap()
			.fail_folder_creation
			.insert(mount_point.to_string());
		self
	}

	/// Granting access to the folder at `mount_point` answers with a failure.
	pub fn fail_grant(self, mount_point: &str) -> Self {
		self.state
			.lock()
			.unwrap()
			.fail_grant
			.insert(mount_point.to_string());
		self
	}

	/// Every call returns a transport error.
	pub fn unreachable(self) -> Self {
		self.state.lock().unwrap().unreachable = true;
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.state.lock().unwrap().calls.clone()
	}

	pub fn has_group(&self, group: &str) -> bool {
		self.state.lock().unwrap().groups.contains_key(group)
	}

	pub fn is_user_enabled(&self, user: &str) -> Option<bool> {
		self.state.lock().unwrap().users.get(user).copied()
	}

	pub fn mount_points(&self) -> Vec<String> {
		self.state
			.lock()
			.unwrap()
			.folders
			.values()
			.map(|f| f.mount_point.clone())
			.collect()
	}

	pub fn folder_groups(&self, mount_point: &str) -> Vec<String> {
		self.state
			.lock()
			.unwrap()
			.folders
			.values()
			.find(|f| f.mount_point == mount_point)
			.map(|f| f.groups.iter().cloned().collect())
			.unwrap_or_default()
	}

	fn enter(&self, call: String) -> Result<std::sync::MutexGuard<'_, State>> {
		let mut state = self.state.lock().unwrap();
		state.calls.push(call);
		if state.unreachable {
			return Err(GroupwareError::InvalidResponse(
				"groupware unreachable".to_string(),
			));
		}
		Ok(state)
	}
}

fn parse_folder_id(folder_id: &str) -> Option<u64> {
	folder_id.parse().ok()
}

fn no_user() -> GroupwareResponse {
	GroupwareResponse::failure(101, "The requested user could not be found")
}

fn no_group() -> GroupwareResponse {
	GroupwareResponse::failure(998, "The requested group could not be found")
}

fn no_folder() -> GroupwareResponse {
	GroupwareResponse::failure(404, "Group folder not found")
}

#[async_trait]
impl GroupwareClient for InMemoryGroupware {
	async fn delete_user(&self, user: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("delete_user {user}"))?;
		Ok(match state.users.remove(user) {
			Some(_) => GroupwareResponse::ok(json!([])),
			None => no_user(),
		})
	}

	async fn enable_user(&self, user: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("enable_user {user}"))?;
		Ok(match state.users.get_mut(user) {
			Some(enabled) => {
				*enabled = true;
				GroupwareResponse::ok(json!([]))
			}
			None => no_user(),
		})
	}

	async fn disable_user(&self, user: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("disable_user {user}"))?;
		Ok(match state.users.get_mut(user) {
			Some(enabled) => {
				*enabled = false;
				GroupwareResponse::ok(json!([]))
			}
			None => no_user(),
		})
	}

	async fn edit_user(&self, user: &str, key: &str, _value: &str) -> Result<GroupwareResponse> {
		let state = self.enter(format!("edit_user {user} {key}"))?;
		Ok(if state.users.contains_key(user) {
			GroupwareResponse::ok(json!([]))
		} else {
			no_user()
		})
	}

	async fn add_group(&self, group: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("add_group {group}"))?;
		if state.fail_group_creation {
			return Ok(GroupwareResponse::failure(103, "Unknown error occurred"));
		}
		if state.groups.contains_key(group) {
			return Ok(GroupwareResponse::failure(102, "group exists"));
		}
		state.groups.insert(group.to_string(), Vec::new());
		Ok(GroupwareResponse::ok(json!([])))
	}

	async fn get_group(&self, group: &str) -> Result<GroupwareResponse> {
		let state = self.enter(format!("get_group {group}"))?;
		Ok(match state.groups.get(group) {
			Some(users) => GroupwareResponse::ok(json!({ "users": users })),
			None => no_group(),
		})
	}

	async fn delete_group(&self, group: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("delete_group {group}"))?;
		Ok(match state.groups.remove(group) {
			Some(_) => GroupwareResponse::ok(json!([])),
			None => GroupwareResponse::failure(101, "group does not exist"),
		})
	}

	async fn get_subadmins(&self, group: &str) -> Result<GroupwareResponse> {
		let state = self.enter(format!("get_subadmins {group}"))?;
		if !state.groups.contains_key(group) {
			return Ok(GroupwareResponse::failure(101, "Group does not exist"));
		}
		let admins: Vec<&String> = state
			.subadmins
			.get(group)
			.map(|s| s.iter().collect())
			.unwrap_or_default();
		Ok(GroupwareResponse::ok(json!(admins)))
	}

	async fn create_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("create_subadmin {user} {group}"))?;
		if !state.groups.contains_key(group) {
			return Ok(GroupwareResponse::failure(102, "Group does not exist"));
		}
		state
			.subadmins
			.entry(group.to_string())
			.or_default()
			.insert(user.to_string());
		Ok(GroupwareResponse::ok(json!([])))
	}

	async fn remove_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("remove_subadmin {user} {group}"))?;
		let removed = state
			.subadmins
			.get_mut(group)
			.map(|s| s.remove(user))
			.unwrap_or(false);
		Ok(if removed {
			GroupwareResponse::ok(json!([]))
		} else {
			GroupwareResponse::failure(102, "User is not a subadmin of this group")
		})
	}

	async fn get_group_folders(&self) -> Result<GroupwareResponse> {
		let state = self.enter("get_group_folders".to_string())?;
		if state.folders.is_empty() {
			return Ok(GroupwareResponse::ok(json!([])));
		}
		let folders: Map<String, Value> = state
			.folders
			.iter()
			.map(|(id, folder)| {
				let groups: Map<String, Value> = folder
					.groups
					.iter()
					.map(|g| (g.clone(), json!(31)))
					.collect();
				(
					id.to_string(),
					json!({
						"id": id,
						"mount_point": folder.mount_point,
						"groups": groups,
					}),
				)
			})
			.collect();
		Ok(GroupwareResponse::ok(Value::Object(folders)))
	}

	async fn create_group_folder(&self, path: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("create_group_folder {path}"))?;
		if state.fail_folder_creation.contains(path) {
			return Ok(GroupwareResponse::failure(500, "Failed to create folder"));
		}
		state.next_folder_id += 1;
		let id = state.next_folder_id;
		state.folders.insert(
			id,
			Folder {
				mount_point: path.to_string(),
				groups: BTreeSet::new(),
			},
		);
		Ok(GroupwareResponse::ok(json!({ "id": id })))
	}

	async fn grant_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("grant_access_to_group_folder {folder_id} {group}"))?;
		let fail_grant = state.fail_grant.clone();
		let Some(folder) = parse_folder_id(folder_id).and_then(|id| state.folders.get_mut(&id))
		else {
			return Ok(no_folder());
		};
		if fail_grant.contains(&folder.mount_point) {
			return Ok(GroupwareResponse::failure(500, "Failed to grant access"));
		}
		folder.groups.insert(group.to_string());
		Ok(GroupwareResponse::ok(json!({ "success": true })))
	}

	async fn revoke_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse> {
		let mut state =
			self.enter(format!("revoke_access_to_group_folder {folder_id} {group}"))?;
		let Some(folder) = parse_folder_id(folder_id).and_then(|id| state.folders.get_mut(&id))
		else {
			return Ok(no_folder());
		};
		folder.groups.remove(group);
		Ok(GroupwareResponse::ok(json!({ "success": true })))
	}

	async fn delete_group_folder(&self, folder_id: &str) -> Result<GroupwareResponse> {
		let mut state = self.enter(format!("delete_group_folder {folder_id}"))?;
		Ok(
			match parse_folder_id(folder_id).and_then(|id| state.folders.remove(&id)) {
				Some(_) => GroupwareResponse::ok(json!({ "success": true })),
				None => no_folder(),
			},
		)
	}
}
