// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::GroupwareError;
use crate::response::GroupwareResponse;

type Result<T> = std::result::Result<T, GroupwareError>;

#[async_trait]
pub trait GroupwareClient: Send + Sync {
	async fn delete_user(&self, user: &str) -> Result<GroupwareResponse>;
	async fn enable_user(&self, user: &str) -> Result<GroupwareResponse>;
	async fn disable_user(&self, user: &str) -> Result<GroupwareResponse>;
	async fn edit_user(&self, user: &str, key: &str, value: &str) -> Result<GroupwareResponse>;

	async fn add_group(&self, group: &str) -> Result<GroupwareResponse>;
	/// `data.users` lists the members.
	async fn get_group(&self, group: &str) -> Result<GroupwareResponse>;
	async fn delete_group(&self, group: &str) -> Result<GroupwareResponse>;

	async fn get_subadmins(&self, group: &str) -> Result<GroupwareResponse>;
	async fn create_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse>;
	async fn remove_subadmin(&self, user: &str, group: &str) -> Result<GroupwareResponse>;

	async fn get_group_folders(&self) -> Result<GroupwareResponse>;
	/// `data.id` is the new folder's id.
	async fn create_group_folder(&self, path: &str) -> Result<GroupwareResponse>;
	async fn grant_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse>;
	async fn revoke_access_to_group_folder(
		&self,
		folder_id: &str,
		group: &str,
	) -> Result<GroupwareResponse>;
	async fn delete_group_folder(&self, folder_id: &str) -> Result<GroupwareResponse>;
}
