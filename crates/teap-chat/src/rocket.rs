// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rocket.Chat REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use teap_common_config::SecretString;
use teap_server_config::ChatConfig;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::response::ChatResponse;

type Result<T> = std::result::Result<T, ChatError>;

/// Token pair returned by `/api/v1/login`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Session {
	auth_token: SecretString,
	user_id: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
	data: LoginData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
	auth_token: String,
	user_id: String,
}

/// What a chat endpoint carries: a JSON body or a `query` selector.
enum Payload<'a> {
	Json(Value),
	Query(&'a Value),
}

/// Logs in on first use and reuses the session until the server answers 401,
/// at which point it logs in again and resends the call once.
#[derive(Debug)]
pub struct RocketChatClient {
	http_client: Client,
	base_url: String,
	user: String,
	password: SecretString,
	session: RwLock<Option<Session>>,
}

impl RocketChatClient {
	pub fn new(config: &ChatConfig) -> Result<Self> {
		let http_client =
			teap_common_http::new_client_with_timeout(Duration::from_secs(config.timeout_secs))?;

		Ok(Self {
			http_client,
			base_url: config.url.clone(),
			user: config.user.clone(),
			password: config.password.clone(),
			session: RwLock::new(None),
		})
	}

	/// Sets a custom base URL (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn url(&self, method: &str) -> Result<Url> {
		let mut url =
			Url::parse(&self.base_url).map_err(|e| ChatError::InvalidUrl(e.to_string()))?;
		url
			.path_segments_mut()
			.map_err(|_| ChatError::InvalidUrl(self.base_url.clone()))?
			.pop_if_empty()
			.extend(["api", "v1", method]);
		Ok(url)
	}

	async fn session(&self) -> Result<Session> {
		if let Some(session) = self.session.read().await.as_ref() {
			return Ok(session.clone());
		}

		let mut slot = self.session.write().await;
		if let Some(session) = slot.as_ref() {
			return Ok(session.clone());
		}
		let session = self.login().await?;
		*slot = Some(session.clone());
		Ok(session)
	}

	/// Drops `stale` unless another call already replaced it.
	async fn invalidate(&self, stale: &Session) {
		let mut slot = self.session.write().await;
		if slot.as_ref() == Some(stale) {
			*slot = None;
		}
	}

	#[instrument(skip(self), fields(user = %self.user))]
	async fn login(&self) -> Result<Session> {
		let url = self.url("login")?;
		let response = self
			.http_client
			.post(url)
			.json(&json!({"user": self.user, "password": self.password.expose()}))
			.send()
			.await
			.map_err(map_send_error)?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			error!(status = status.as_u16(), body = %body, "Chat login rejected");
			return Err(ChatError::Login(format!("status {status}")));
		}

		let parsed: LoginResponse = response.json().await.map_err(|e| {
			error!(error = %e, "Failed to parse chat login response");
			ChatError::InvalidResponse(e.to_string())
		})?;

		info!(user_id = %parsed.data.user_id, "Logged in to chat");
		Ok(Session {
			auth_token: SecretString::new(parsed.data.auth_token),
			user_id: parsed.data.user_id,
		})
	}

	fn authed(
		&self,
		session: &Session,
		method: Method,
		endpoint: &str,
		payload: &Payload<'_>,
	) -> Result<RequestBuilder> {
		let url = self.url(endpoint)?;
		debug!(method = %method, path = url.path(), "Sending chat request");
		let request = self
			.http_client
			.request(method, url)
			.header("X-Auth-Token", session.auth_token.expose())
			.header("X-User-Id", &session.user_id);
		Ok(match payload {
			Payload::Json(body) => request.json(body),
			Payload::Query(query) => request.query(&[("query", query.to_string())]),
		})
	}

	async fn call(&self, method: Method, endpoint: &str, payload: Payload<'_>) -> Result<ChatResponse> {
		let session = self.session().await?;
		let response = self
			.send(self.authed(&session, method.clone(), endpoint, &payload)?)
			.await?;
		if response.status != 401 {
			return Ok(response);
		}

		warn!(endpoint, "Chat session rejected, logging in again");
		self.invalidate(&session).await;
		let session = self.session().await?;
		self.send(self.authed(&session, method, endpoint, &payload)?).await
	}

	async fn send(&self, request: RequestBuilder) -> Result<ChatResponse> {
		let response = request.send().await.map_err(map_send_error)?;
		let status = response.status().as_u16();
		let text = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read chat response body");
			ChatError::Network(e)
		})?;
		trace!(status, body = %text, "Chat response");

		let body = serde_json::from_str(&text).unwrap_or(Value::Null);
		if status != 200 {
			debug!(status, "Chat call was not successful");
		}
		Ok(ChatResponse::new(status, body))
	}
}

fn map_send_error(e: reqwest::Error) -> ChatError {
	if e.is_timeout() {
		error!("Chat request timed out");
		return ChatError::Timeout;
	}
	error!(error = %e, "Network error during chat request");
	ChatError::Network(e)
}

#[async_trait]
impl ChatClient for RocketChatClient {
	#[instrument(skip(self, password, email))]
	async fn create_user(
		&self,
		username: &str,
		password: &str,
		email: &str,
		name: &str,
	) -> Result<ChatResponse> {
		let body = json!({
			"email": email,
			"name": name,
			"password": password,
			"username": username,
			"requirePasswordChange": true,
		});
		self.call(Method::POST, "users.create", Payload::Json(body)).await
	}

	#[instrument(skip(self))]
	async fn create_channel(&self, name: &str) -> Result<ChatResponse> {
		let body = json!({ "name": name });
		self.call(Method::POST, "channels.create", Payload::Json(body)).await
	}

	#[instrument(skip(self))]
	async fn delete_user(&self, user_id: &str) -> Result<ChatResponse> {
		let body = json!({ "userId": user_id });
		self.call(Method::POST, "users.delete", Payload::Json(body)).await
	}

	#[instrument(skip(self))]
	async fn list_channels(&self, query: &Value) -> Result<ChatResponse> {
		self.call(Method::GET, "channels.list", Payload::Query(query)).await
	}

	#[instrument(skip(self))]
	async fn list_users(&self, query: &Value) -> Result<ChatResponse> {
		self.call(Method::GET, "users.list", Payload::Query(query)).await
	}
}
