// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Chat (Rocket.Chat) service account settings.

use serde::Deserialize;
use teap_common_config::SecretString;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ChatConfig {
	pub url: String,
	pub user: String,
	pub password: SecretString,
	pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub user: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl ChatConfigLayer {
	pub fn merge(&mut self, other: ChatConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.user.is_some() {
			self.user = other.user;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self, password: Option<SecretString>) -> Option<ChatConfig> {
		Some(ChatConfig {
			url: self.url?,
			user: self.user?,
			password: password?,
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		})
	}
}
