// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ChatError;
use crate::response::ChatResponse;

/// Raw chat operations. Non-200 answers are returned as responses; only
/// transport and login failures are errors.
#[async_trait]
pub trait ChatClient: Send + Sync {
	async fn create_user(
		&self,
		username: &str,
		password: &str,
		email: &str,
		name: &str,
	) -> Result<ChatResponse, ChatError>;

	async fn create_channel(&self, name: &str) -> Result<ChatResponse, ChatError>;

	async fn delete_user(&self, user_id: &str) -> Result<ChatResponse, ChatError>;

	/// `query` is a Mongo-style selector such as `{"fname": {"$eq": "x"}}`.
	async fn list_channels(&self, query: &Value) -> Result<ChatResponse, ChatError>;

	async fn list_users(&self, query: &Value) -> Result<ChatResponse, ChatError>;
}
