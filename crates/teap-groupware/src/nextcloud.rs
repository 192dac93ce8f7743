// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Nextcloud OCS v1 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use teap_common_config::SecretString;
use teap_server_config::GroupwareConfig;
use tracing::{debug, error, instrument, trace};

use crate::client::GroupwareClient;
use crate::error::GroupwareError;
use crate::response::GroupwareResponse;

const USERS_PATH: &[&str] = &["ocs", "v1.php", "cloud", "users"];
const GROUPS_PATH: &[&str] = &["ocs", "v1.php", "cloud", "groups"];
const FOLDERS_PATH: &[&str] = &["apps", "groupfolders", "folders"];

type Result<T> = std::result::Result<T, GroupwareError>;

#[derive(Debug, Clone)]
pub struct NextcloudClient {
	http_client: Client,
	base_url: String,
	user: String,
	password: SecretString,
}

impl NextcloudClient {
	pub fn new(config: &GroupwareConfig) -> Result<Self> {
		let http_client =
			teap_common_http::new_client_with_timeout(Duration::from_secs(config.timeout_secs))?;

		Ok(Self {
			http_client,
			base_url: config.url.clone(),
			user: config.user.clone(),
			password: config.password.clone(),
		})
	}

	/// Sets a custom base URL (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn url(&self, prefix: &[&str], rest: &[&str]) -> Result<Url> {
		let mut url =
			Url::parse(&self.base_url).map_err(|e| GroupwareError::InvalidUrl(e.to_string()))?;
		url
			.path_segments_mut()
			.map_err(|_| GroupwareError::InvalidUrl(self.base_url.clone()))?
			.pop_if_empty()
			.extend(prefix)
			.extend(rest);
		url.query_pairs_mut().append_pair("format", "json");
		Ok(url)
	}

	async fn send(
		&self,
		method: Method,
		url: Url,
		form: &[(&str, &str)],
	) -> Result<GroupwareResponse> {
		debug!(method = %method, path = url.path(), "Sending groupware request");

		let mut request = self
			.http_client
			.request(method, url)
			.basic_auth(&self.user, Some(self.password.expose()))
			.header("OCS-APIRequest", "true")
			.header(reqwest::header::ACCEPT, "application/json");
		if !form.is_empty() {
			request = request.form(form);
		}

		let response = request.send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Groupware request timed out");
				return GroupwareError::Timeout;
			}
			error!(error = %e, "Network error during groupware request");
			GroupwareError::Network(e)
		})?;

		let status = response.status();
		debug!(status = %status, "Received groupware response");

		if status == reqwest::StatusCode::UNAUTHORIZED {
			error!(status = status.as_u16(), "Groupware rejected credentials");
			return Err(GroupwareError::Unauthorized);
		}

		let body = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read groupware response body");
			GroupwareError::Network(e)
		})?;
		trace!(body = %body, "Response body");

		match GroupwareResponse::from_ocs_json(&body) {
			Ok(parsed) => Ok(parsed),
			Err(_) if !status.is_success() => {
				error!(status = status.as_u16(), body = %body, "Groupware API error");
				Err(GroupwareError::ApiError {
					status: status.as_u16(),
					message: body,
				})
			}
			Err(e) => {
				error!(error = %e, "Failed to parse groupware response");
				Err(e)
			}
		}
	}
}

#[async_trait]
impl GroupwareClient for NextcloudClient {
	#[instrument(skip(self))]
	async fn delete_user(&self, user: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user])?;
		self.send(Method::DELETE, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn enable_user(&self, user: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user, "enable"])?;
		self.send(Method::PUT, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn disable_user(&self, user: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user, "disable"])?;
		self.send(Method::PUT, url, &[]).await
	}

	#[instrument(skip(self, value))]
	async fn edit_user(&self, user: &str, key: &str, value: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user])?;
		self.send(Method::PUT, url, &[("key", key), ("value", value)])
			.await
	}

	#[instrument(skip(self))]
	async fn add_group(&self, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(GROUPS_PATH, &[])?;
		self.send(Method::POST, url, &[("groupid", group)]).await
	}

	#[instrument(skip(self))]
	async fn get_group(&self, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(GROUPS_PATH, &[group])?;
		self.send(Method::GET, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn delete_group(&self, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(GROUPS_PATH, &[group])?;
		self.send(Method::DELETE, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn get_subadmins(&self, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(GROUPS_PATH, &[group, "subadmins"])?;
		self.send(Method::GET, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn create_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user, "subadmins"])?;
		self.send(Method::POST, url, &[("groupid", group)]).await
	}

	#[instrument(skip(self))]
	async fn remove_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse> {
		let url = self.url(USERS_PATH, &[user, "subadmins"])?;
		self.send(Method::DELETE, url, &[("groupid", group)]).await
	}

	#[instrument(skip(self))]
	async fn get_group_folders(&self) -> Result<GroupwareResponse> {
		let url = self.url(FOLDERS_PATH, &[])?;
		self.send(Method::GET, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn create_group_folder(&self, path: &str) -> Result<GroupwareResponse> {
		let url = self.url(FOLDERS_PATH, &[])?;
		self.send(Method::POST, url, &[("mountpoint", path)]).await
	}

	#[instrument(skip(self))]
	async fn grant_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse> {
		let url = self.url(FOLDERS_PATH, &[folder_id, "groups"])?;
		self.send(Method::POST, url, &[("group", group)]).await
	}

	#[instrument(skip(self))]
	async fn revoke_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse> {
		let url = self.url(FOLDERS_PATH, &[folder_id, "groups", group])?;
		self.send(Method::DELETE, url, &[]).await
	}

	#[instrument(skip(self))]
	async fn delete_group_folder(&self, folder_id: &str) -> Result<GroupwareResponse> {
		let url = self.url(FOLDERS_PATH, &[folder_id])?;
		self.send(Method::DELETE, url, &[]).await
	}
}
