// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scripted [`ChatClient`] for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::response::ChatResponse;

#[derive(Debug)]
struct State {
	channels: Vec<Value>,
	users: Vec<Value>,
	create_status: u16,
	failing: bool,
	calls: Vec<String>,
}

/// Answers create calls with a fixed status and lookups from canned records.
///
/// Lookups honour `{"<field>": {"$eq": value}}` selectors only.
#[derive(Debug)]
pub struct ScriptedChat {
	state: Mutex<State>,
}

impl Default for ScriptedChat {
	fn default() -> Self {
		Self {
			state: Mutex::new(State {
				channels: Vec::new(),
				users: Vec::new(),
				create_status: 200,
				failing: false,
				calls: Vec::new(),
			}),
		}
	}
}

impl ScriptedChat {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_channel(self, channel: Value) -> Self {
		self.state.lock().unwrap().channels.push(channel);
		self
	}

	pub fn with_user(self, user: Value) -> Self {
		self.state.lock().unwrap().users.push(user);
		self
	}

	/// Status returned by create and delete calls (200 by default).
	pub fn with_create_status(self, status: u16) -> Self {
		self.state.lock().unwrap().create_status = status;
		self
	}

	/// Every call returns a transport error.
	pub fn failing(self) -> Self {
		self.state.lock().unwrap().failing = true;
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.state.lock().unwrap().calls.clone()
	}

	fn enter(&self, call: String) -> Result<std::sync::MutexGuard<'_, State>, ChatError> {
		let mut state = self.state.lock().unwrap();
		state.calls.push(call);
		if state.failing {
			return Err(ChatError::Timeout);
		}
		Ok(state)
	}

	fn write_response(state: &State) -> ChatResponse {
		let success = state.create_status == 200;
		ChatResponse::new(state.create_status, json!({ "success": success }))
	}
}

fn matches_selector(record: &Value, query: &Value) -> bool {
	let Some(selector) = query.as_object() else {
		return true;
	};
	selector.iter().all(|(field, condition)| {
		let expected = condition.get("$eq").unwrap_or(condition);
		record.get(field) == Some(expected)
	})
}

fn listing(records: &[Value], query: &Value, key: &str) -> ChatResponse {
	let found: Vec<&Value> = records
		.iter()
		.filter(|r| matches_selector(r, query))
		.collect();
	let mut body = Map::new();
	body.insert(key.to_string(), json!(found));
	body.insert("success".to_string(), json!(true));
	ChatResponse::new(200, Value::Object(body))
}

#[async_trait]
impl ChatClient for ScriptedChat {
	async fn create_user(
		&self,
		username: &str,
		_password: &str,
		email: &str,
		name: &str,
	) -> Result<ChatResponse, ChatError> {
		let mut state = self.enter(format!("create_user {username}"))?;
		let response = Self::write_response(&state);
		if response.is_success() {
			state.users.push(json!({
				"_id": format!("id-{username}"),
				"username": username,
				"name": name,
				"emails": [{"address": email}],
			}));
		}
		Ok(response)
	}

	async fn create_channel(&self, name: &str) -> Result<ChatResponse, ChatError> {
		let mut state = self.enter(format!("create_channel {name}"))?;
		let response = Self::write_response(&state);
		if response.is_success() {
			state
				.channels
				.push(json!({"_id": format!("id-{name}"), "fname": name}));
		}
		Ok(response)
	}

	async fn delete_user(&self, user_id: &str) -> Result<ChatResponse, ChatError> {
		let mut state = self.enter(format!("delete_user {user_id}"))?;
		let before = state.users.len();
		state.users.retain(|u| u["_id"] != user_id);
		if state.users.len() == before {
			return Ok(ChatResponse::new(
				400,
				json!({"success": false, "error": "The required \"userId\" param provided does not match any users"}),
			));
		}
		Ok(ChatResponse::new(200, json!({ "success": true })))
	}

	async fn list_channels(&self, query: &Value) -> Result<ChatResponse, ChatError> {
		let state = self.enter(format!("list_channels {query}"))?;
		Ok(listing(&state.channels, query, "channels"))
	}

	async fn list_users(&self, query: &Value) -> Result<ChatResponse, ChatError> {
		let state = self.enter(format!("list_users {query}"))?;
		Ok(listing(&state.users, query, "users"))
	}
}
