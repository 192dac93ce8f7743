// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit event model.
//!
//! - [`AuditEventKind`]: the side effects worth recording
//! - [`AuditEvent`]: one immutable record
//! - [`AuditEventBuilder`]: fluent construction

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest message stored with an event, in characters.
pub const MAX_MESSAGE_LEN: usize = 500;

/// Kinds of events that can be recorded. Stored as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
	CreateChatUser,
	CreateChatChannel,
	DirectoryUserCreated,
	GroupFolderProvisioned,
}

impl AuditEventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			AuditEventKind::CreateChatUser => "create_chat_user",
			AuditEventKind::CreateChatChannel => "create_chat_channel",
			AuditEventKind::DirectoryUserCreated => "directory_user_created",
			AuditEventKind::GroupFolderProvisioned => "group_folder_provisioned",
		}
	}

	pub fn all() -> &'static [AuditEventKind] {
		&[
			AuditEventKind::CreateChatUser,
			AuditEventKind::CreateChatChannel,
			AuditEventKind::DirectoryUserCreated,
			AuditEventKind::GroupFolderProvisioned,
		]
	}
}

impl fmt::Display for AuditEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown audit event kind '{}'", self.0)
	}
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for AuditEventKind {
	type Err = UnknownEventKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AuditEventKind::all()
			.iter()
			.copied()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| UnknownEventKind(s.to_string()))
	}
}

/// One recorded side effect. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
	pub kind: AuditEventKind,
	pub timestamp: DateTime<Utc>,
	pub success: bool,
	/// Inputs and outcome of the recorded call.
	pub data: serde_json::Value,
	pub message: Option<String>,
}

impl AuditEvent {
	pub fn builder(kind: AuditEventKind) -> AuditEventBuilder {
		AuditEventBuilder::new(kind)
	}
}

#[derive(Debug, Clone)]
pub struct AuditEventBuilder {
	kind: AuditEventKind,
	success: bool,
	data: serde_json::Value,
	message: Option<String>,
}

impl AuditEventBuilder {
	pub fn new(kind: AuditEventKind) -> Self {
		Self {
			kind,
			success: false,
			data: serde_json::Value::Null,
			message: None,
		}
	}

	pub fn success(mut self, success: bool) -> Self {
		self.success = success;
		self
	}

	pub fn payload(mut self, data: serde_json::Value) -> Self {
		self.data = data;
		self
	}

	/// Human-readable note. Truncated to [`MAX_MESSAGE_LEN`] characters.
	pub fn message(mut self, message: impl Into<String>) -> Self {
		let message: String = message.into();
		self.message = Some(message.chars().take(MAX_MESSAGE_LEN).collect());
		self
	}

	pub fn build(self) -> AuditEvent {
		AuditEvent {
			kind: self.kind,
			timestamp: Utc::now(),
			success: self.success,
			data: self.data,
			message: self.message,
		}
	}
}
