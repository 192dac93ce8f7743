// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use teap_common_config::SecretString;

use crate::entry::DirectoryEntry;
use crate::error::DirectoryError;

#[derive(Debug, Clone)]
pub struct NewDirectoryUser {
	pub uid: String,
	pub given_name: String,
	pub surname: String,
	pub password: SecretString,
}

impl NewDirectoryUser {
	/// Common name stored on the entry: `"<given> <surname>"`.
	pub fn common_name(&self) -> String {
		format!("{} {}", self.given_name, self.surname)
	}
}

/// Organisational containers exposed as typed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgUnit {
	Divisions,
	Franchises,
	Teams,
}

/// Group search by common name. Values are escaped by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
	/// `cn=<value>*`
	CnPrefix(String),
	/// `cn=<value>`
	CnEquals(String),
}

impl GroupFilter {
	pub fn matches(&self, cn: &str) -> bool {
		match self {
			GroupFilter::CnPrefix(prefix) => cn.starts_with(prefix.as_str()),
			GroupFilter::CnEquals(name) => cn == name,
		}
	}
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
	async fn get_users(&self) -> Result<Vec<DirectoryEntry>, DirectoryError>;

	/// Exactly one entry with this uid, else `NotFound` / `MultipleFound`.
	async fn get_user(&self, uid: &str) -> Result<DirectoryEntry, DirectoryError>;

	async fn add_user(&self, user: &NewDirectoryUser) -> Result<(), DirectoryError>;

	/// Groups that list the user as a member.
	async fn get_user_groups(&self, uid: &str) -> Result<Vec<DirectoryEntry>, DirectoryError>;

	async fn make_uid_member_of(&self, uid: &str, group_fqdn: &str)
		-> Result<(), DirectoryError>;

	async fn remove_uid_member_of(
		&self,
		uid: &str,
		group_fqdn: &str,
	) -> Result<(), DirectoryError>;

	async fn get_groups(
		&self,
		filter: Option<GroupFilter>,
	) -> Result<Vec<DirectoryEntry>, DirectoryError>;

	async fn get_org_units(&self, unit: OrgUnit) -> Result<Vec<DirectoryEntry>, DirectoryError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn common_name_joins_given_and_surname() {
		let user = NewDirectoryUser {
			uid: "jdoe".to_string(),
			given_name: "Jane".to_string(),
			surname: "Doe".to_string(),
			password: SecretString::new("pw".to_string()),
		};
		assert_eq!(user.common_name(), "Jane Doe");
	}

	#[test]
	fn group_filter_matching() {
		assert!(GroupFilter::CnPrefix("Div".to_string()).matches("DivisionA"));
		assert!(!GroupFilter::CnPrefix("Div".to_string()).matches("Country"));
		assert!(GroupFilter::CnEquals("ops".to_string()).matches("ops"));
		assert!(!GroupFilter::CnEquals("ops".to_string()).matches("ops2"));
	}
}
