// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use teap_server_audit::{AuditEvent, AuditEventKind, AuditService};
use tracing::{error, instrument, warn};

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::response::ChatResponse;

/// Result of a create call. `success` is true only for an HTTP 200 answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOutcome {
	pub success: bool,
	pub response: Option<ChatResponse>,
	pub error: Option<String>,
}

impl ChatOutcome {
	fn from_result(result: Result<ChatResponse, ChatError>) -> Self {
		match result {
			Ok(response) => Self {
				success: response.is_success(),
				response: Some(response),
				error: None,
			},
			Err(e) => Self {
				success: false,
				response: None,
				error: Some(e.to_string()),
			},
		}
	}
}

/// Audited front for a [`ChatClient`].
#[derive(Clone)]
pub struct ChatService {
	client: Arc<dyn ChatClient>,
	audit: AuditService,
}

impl ChatService {
	pub fn new(client: Arc<dyn ChatClient>, audit: AuditService) -> Self {
		Self { client, audit }
	}

	#[instrument(skip(self, password, email))]
	pub async fn create_user(
		&self,
		username: &str,
		password: &str,
		email: &str,
		name: &str,
	) -> ChatOutcome {
		let result = self.client.create_user(username, password, email, name).await;
		if let Err(e) = &result {
			error!(error = %e, username, "Failed to create chat user");
		}
		let outcome = ChatOutcome::from_result(result);

		self.audit(
			AuditEventKind::CreateChatUser,
			json!({"username": username, "email": email, "name": name}),
			&outcome,
		)
		.await;
		outcome
	}

	#[instrument(skip(self))]
	pub async fn create_channel(&self, channel_name: &str) -> ChatOutcome {
		let result = self.client.create_channel(channel_name).await;
		if let Err(e) = &result {
			error!(error = %e, channel_name, "Failed to create chat channel");
		}
		let outcome = ChatOutcome::from_result(result);

		self.audit(
			AuditEventKind::CreateChatChannel,
			json!({ "channel_name": channel_name }),
			&outcome,
		)
		.await;
		outcome
	}

	pub async fn delete_user(&self, user_id: &str) -> Result<ChatResponse, ChatError> {
		self.client.delete_user(user_id).await
	}

	pub async fn get_channel_by_name(&self, name: &str) -> Option<Value> {
		let query = json!({"fname": {"$eq": name}});
		first_match(self.client.list_channels(&query).await, "channels")
	}

	pub async fn get_user_by_username(&self, username: &str) -> Option<Value> {
		let query = json!({"username": {"$eq": username}});
		first_match(self.client.list_users(&query).await, "users")
	}

	async fn audit(&self, kind: AuditEventKind, mut data: Value, outcome: &ChatOutcome) {
		if let Value::Object(map) = &mut data {
			map.insert(
				"status".to_string(),
				json!(outcome.response.as_ref().map(|r| r.status)),
			);
		}
		let mut event = AuditEvent::builder(kind)
			.success(outcome.success)
			.payload(data);
		if let Some(error) = &outcome.error {
			event = event.message(error.clone());
		}
		self.audit.log(event.build()).await;
	}
}

fn first_match(result: Result<ChatResponse, ChatError>, key: &str) -> Option<Value> {
	match result {
		Ok(response) if response.is_success() => response.first_of(key),
		Ok(response) => {
			warn!(status = response.status, key, "Chat lookup was not successful");
			None
		}
		Err(e) => {
			warn!(error = %e, key, "Chat lookup failed");
			None
		}
	}
}

impl std::fmt::Debug for ChatService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChatService")
			.field("audit", &self.audit)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::ScriptedChat;
	use teap_server_audit::{AuditConfig, MemoryAuditSink};

	fn service_with(chat: ScriptedChat) -> (ChatService, Arc<MemoryAuditSink>) {
		let sink = Arc::new(MemoryAuditSink::new());
		let audit = AuditService::new(&AuditConfig { enabled: true }, vec![sink.clone()]);
		(ChatService::new(Arc::new(chat), audit), sink)
	}

	#[tokio::test]
	async fn client_error_is_recorded_once_and_not_propagated() {
		let (service, sink) = service_with(ScriptedChat::new().failing());

		let outcome = service
			.create_user("jdoe", "pw", "jdoe@example.org", "John Doe")
			.await;

		assert!(!outcome.success);
		assert!(outcome.error.is_some());
		let events = sink.events();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].kind, AuditEventKind::CreateChatUser);
		assert!(!events[0].success);
		assert!(events[0].message.is_some());
	}

	#[tokio::test]
	async fn password_never_reaches_audit_payload() {
		let (service, sink) = service_with(ScriptedChat::new());

		let outcome = service
			.create_user("jdoe", "hunter2", "jdoe@example.org", "John Doe")
			.await;

		assert!(outcome.success);
		let event = &sink.events()[0];
		assert!(event.success);
		assert_eq!(event.data["username"], "jdoe");
		assert_eq!(event.data["email"], "jdoe@example.org");
		assert_eq!(event.data["status"], 200);
		assert!(!event.data.to_string().contains("hunter2"));
	}

	#[tokio::test]
	async fn non_200_create_is_failure() {
		let (service, sink) = service_with(ScriptedChat::new().with_create_status(201));

		let outcome = service.create_channel("general").await;

		assert!(!outcome.success);
		assert_eq!(outcome.response.unwrap().status, 201);
		let events = sink.events_of(AuditEventKind::CreateChatChannel);
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].data["channel_name"], "general");
	}

	#[tokio::test]
	async fn lookups_return_first_match_or_none() {
		let chat = ScriptedChat::new()
			.with_channel(json!({"_id": "c1", "fname": "general"}))
			.with_user(json!({"_id": "u1", "username": "jdoe"}));
		let (service, _) = service_with(chat);

		assert_eq!(
			service.get_channel_by_name("general").await.unwrap()["_id"],
			"c1"
		);
		assert!(service.get_channel_by_name("random").await.is_none());
		assert_eq!(
			service.get_user_by_username("jdoe").await.unwrap()["_id"],
			"u1"
		);
		assert!(service.get_user_by_username("other").await.is_none());
	}

	#[tokio::test]
	async fn lookup_errors_yield_none() {
		let (service, sink) = service_with(ScriptedChat::new().failing());
		assert!(service.get_user_by_username("jdoe").await.is_none());
		assert!(sink.events().is_empty());
	}
}
