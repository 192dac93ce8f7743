// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use teap_chat::{ChatError, ChatService, RocketChatClient};
use teap_directory::{DirectoryClient, LdapDirectoryClient};
use teap_groupware::{GroupwareClient, GroupwareError, NextcloudClient};
use teap_server_audit::{AuditService, AuditSink, SqliteAuditSink, TracingAuditSink};
use teap_server_config::ServerConfig;
use teap_server_db::{AuditRepository, SqlitePool};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::routes;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("failed to build groupware client: {0}")]
	Groupware(#[from] GroupwareError),
	#[error("failed to build chat client: {0}")]
	Chat(#[from] ChatError),
}

/// Shared state handed to every handler.
///
/// Collaborators left as `None` are not configured; their routes answer 503.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub audit: AuditService,
	pub audit_repo: Arc<AuditRepository>,
	pub directory: Option<Arc<dyn DirectoryClient>>,
	pub groupware: Option<Arc<dyn GroupwareClient>>,
	pub chat: Option<ChatService>,
}

impl AppState {
	pub fn new(pool: SqlitePool, audit: AuditService) -> Self {
		Self {
			audit_repo: Arc::new(AuditRepository::new(pool.clone())),
			pool,
			audit,
			directory: None,
			groupware: None,
			chat: None,
		}
	}

	pub fn with_directory(mut self, directory: Arc<dyn DirectoryClient>) -> Self {
		self.directory = Some(directory);
		self
	}

	pub fn with_groupware(mut self, groupware: Arc<dyn GroupwareClient>) -> Self {
		self.groupware = Some(groupware);
		self
	}

	pub fn with_chat(mut self, chat: ChatService) -> Self {
		self.chat = Some(chat);
		self
	}

	pub fn directory(&self) -> Result<&dyn DirectoryClient, ApiError> {
		self.directory
			.as_deref()
			.ok_or_else(|| ApiError::Unavailable("Directory is not configured".to_string()))
	}

	pub fn groupware(&self) -> Result<&dyn GroupwareClient, ApiError> {
		self.groupware
			.as_deref()
			.ok_or_else(|| ApiError::Unavailable("Groupware is not configured".to_string()))
	}

	pub fn chat(&self) -> Result<&ChatService, ApiError> {
		self.chat
			.as_ref()
			.ok_or_else(|| ApiError::Unavailable("Chat is not configured".to_string()))
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("audit", &self.audit)
			.field("directory", &self.directory.is_some())
			.field("groupware", &self.groupware.is_some())
			.field("chat", &self.chat.is_some())
			.finish_non_exhaustive()
	}
}

/// Build the audit service and every configured client.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, StartupError> {
	let sinks: Vec<Arc<dyn AuditSink>> = vec![
		Arc::new(SqliteAuditSink::new(pool.clone())),
		Arc::new(TracingAuditSink::new()),
	];
	let audit = AuditService::new(&config.audit, sinks);
	let mut state = AppState::new(pool, audit.clone());

	match &config.directory {
		Some(directory) => {
			info!(url = %directory.url, "directory client enabled");
			state = state.with_directory(Arc::new(LdapDirectoryClient::new(directory.clone())));
		}
		None => warn!("directory not configured, directory routes will answer 503"),
	}

	match &config.groupware {
		Some(groupware) => {
			info!(url = %groupware.url, "groupware client enabled");
			state = state.with_groupware(Arc::new(NextcloudClient::new(groupware)?));
		}
		None => warn!("groupware not configured, groupware routes will answer 503"),
	}

	match &config.chat {
		Some(chat) => {
			info!(url = %chat.url, "chat client enabled");
			let client = Arc::new(RocketChatClient::new(chat)?);
			state = state.with_chat(ChatService::new(client, audit));
		}
		None => warn!("chat not configured, chat routes will answer 503"),
	}

	Ok(state)
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/users/",
			get(routes::users::list_users).post(routes::users::create_user),
		)
		.route(
			"/api/users/{username}",
			get(routes::users::retrieve_user)
				.delete(routes::users::delete_user)
				.patch(routes::users::edit_user),
		)
		.route(
			"/api/users/{username}/groups/",
			post(routes::users::add_membership).delete(routes::users::remove_membership),
		)
		.route(
			"/api/users/{username}/{action}",
			patch(routes::users::set_user_state),
		)
		.route(
			"/api/groups/",
			get(routes::groups::list_groups)
				.post(routes::groups::create_group)
				.delete(routes::groups::bulk_delete_groups),
		)
		.route(
			"/api/groups/{group_name}",
			get(routes::groups::retrieve_group).delete(routes::groups::delete_group),
		)
		.route(
			"/api/groups/{group_name}/subadmins",
			get(routes::subadmins::list_subadmins).post(routes::subadmins::create_subadmin),
		)
		.route(
			"/api/groups/{group_name}/subadmins/{username}",
			delete(routes::subadmins::remove_subadmin),
		)
		.route(
			"/api/groups-with-folders",
			post(routes::group_folders::create_group_with_folder),
		)
		.route("/api/divisions", get(routes::org_units::list_divisions))
		.route("/api/franchises", get(routes::org_units::list_franchises))
		.route("/api/teams", get(routes::org_units::list_teams))
		.route("/api/chat/users", post(routes::chat::create_chat_user))
		.route(
			"/api/chat/users/{user}",
			get(routes::chat::get_chat_user).delete(routes::chat::delete_chat_user),
		)
		.route("/api/chat/channels", post(routes::chat::create_chat_channel))
		.route(
			"/api/chat/channels/{name}",
			get(routes::chat::get_chat_channel),
		)
		.route("/api/actions", get(routes::actions::list_actions))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
