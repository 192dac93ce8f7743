// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GroupwareError;

/// OCS status codes meaning success (v1 uses 100, v2 uses 200).
const OK_STATUS_CODES: &[u32] = &[100, 200];

/// Outcome of one OCS call.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupwareResponse {
	pub is_ok: bool,
	pub status_code: u32,
	pub message: String,
	pub data: Value,
}

/// The shape callers of the REST API see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupwareEnvelope {
	pub status: bool,
	pub message: String,
	pub data: Value,
}

#[derive(Debug, Deserialize)]
struct OcsBody {
	ocs: Ocs,
}

#[derive(Debug, Deserialize)]
struct Ocs {
	meta: OcsMeta,
	#[serde(default)]
	data: Value,
}

#[derive(Debug, Deserialize)]
struct OcsMeta {
	statuscode: u32,
	#[serde(default)]
	message: Option<String>,
}

impl GroupwareResponse {
	pub fn new(status_code: u32, message: impl Into<String>, data: Value) -> Self {
		Self {
			is_ok: OK_STATUS_CODES.contains(&status_code),
			status_code,
			message: message.into(),
			data,
		}
	}

	pub fn ok(data: Value) -> Self {
		Self::new(100, "OK", data)
	}

	pub fn failure(status_code: u32, message: impl Into<String>) -> Self {
		Self::new(status_code, message, Value::Array(Vec::new()))
	}

	/// Parse an OCS JSON body (`{"ocs": {"meta": {...}, "data": ...}}`).
	pub fn from_ocs_json(body: &str) -> Result<Self, GroupwareError> {
		let parsed: OcsBody = serde_json::from_str(body)
			.map_err(|e| GroupwareError::InvalidResponse(format!("JSON parse error: {e}")))?;
		Ok(Self::new(
			parsed.ocs.meta.statuscode,
			parsed.ocs.meta.message.unwrap_or_default(),
			parsed.ocs.data,
		))
	}

	pub fn envelope(&self) -> GroupwareEnvelope {
		GroupwareEnvelope {
			status: self.is_ok,
			message: self.message.clone(),
			data: self.data.clone(),
		}
	}

	/// The `id` in `data`, as a string. Numeric ids are converted.
	pub fn data_id(&self) -> Option<String> {
		match self.data.get("id")? {
			Value::String(id) => Some(id.clone()),
			Value::Number(id) => Some(id.to_string()),
			_ => None,
		}
	}

	/// Member user ids from a group lookup (`data.users`).
	pub fn group_users(&self) -> Vec<String> {
		self
			.data
			.get("users")
			.and_then(Value::as_array)
			.map(|users| {
				users
					.iter()
					.filter_map(|u| u.as_str().map(str::to_string))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Id of the group folder mounted at `mount_point`.
	///
	/// `data` is a map of folder id to folder, or an empty list when there
	/// are no folders.
	pub fn folder_id_for_mount_point(&self, mount_point: &str) -> Option<String> {
		let folders = self.data.as_object()?;
		folders.iter().find_map(|(key, folder)| {
			(folder.get("mount_point").and_then(Value::as_str) == Some(mount_point))
				.then(|| key.clone())
		})
	}
}
