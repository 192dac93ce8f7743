// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`DirectoryClient`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{DirectoryClient, GroupFilter, NewDirectoryUser, OrgUnit};
use crate::entry::DirectoryEntry;
use crate::error::DirectoryError;

const USERS_BASE: &str = "ou=People,dc=example,dc=org";
const MEMBER_ATTRIBUTE: &str = "uniqueMember";

#[derive(Default)]
struct State {
	users: Vec<DirectoryEntry>,
	groups: Vec<DirectoryEntry>,
	org_units: HashMap<OrgUnit, Vec<DirectoryEntry>>,
}

/// Behaves like a small directory: users under `ou=People`, groups holding
/// `uniqueMember` values, and refused changes reported as
/// `ConstraintViolation`.
#[derive(Default)]
pub struct InMemoryDirectory {
	state: Mutex<State>,
}

impl InMemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn user_dn(uid: &str) -> String {
		format!("uid={uid},{USERS_BASE}")
	}

	pub fn group_dn(cn: &str) -> String {
		format!("cn={cn},ou=Groups,dc=example,dc=org")
	}

	/// Adds a raw user entry; duplicates are allowed so `MultipleFound` can be
	/// exercised.
	pub fn with_user(self, uid: &str) -> Self {
		let entry = DirectoryEntry::new(Self::user_dn(uid))
			.with_attr("uid", uid)
			.with_attr("objectClass", "inetOrgPerson");
		self.state.lock().unwrap().users.push(entry);
		self
	}

	pub fn with_group(self, cn: &str) -> Self {
		let entry = DirectoryEntry::new(Self::group_dn(cn))
			.with_attr("cn", cn)
			.with_attr("objectClass", "groupOfUniqueNames");
		self.state.lock().unwrap().groups.push(entry);
		self
	}

	pub fn with_org_unit(self, unit: OrgUnit, entry: DirectoryEntry) -> Self {
		self.state
			.lock()
			.unwrap()
			.org_units
			.entry(unit)
			.or_default()
			.push(entry);
		self
	}

	pub fn users(&self) -> Vec<DirectoryEntry> {
		self.state.lock().unwrap().users.clone()
	}

	pub fn members_of(&self, group_fqdn: &str) -> Vec<String> {
		self.state
			.lock()
			.unwrap()
			.groups
			.iter()
			.find(|g| g.fqdn == group_fqdn)
			.map(|g| g.values(MEMBER_ATTRIBUTE).to_vec())
			.unwrap_or_default()
	}
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
	async fn get_users(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		Ok(self.users())
	}

	async fn get_user(&self, uid: &str) -> Result<DirectoryEntry, DirectoryError> {
		let state = self.state.lock().unwrap();
		let mut matches = state.users.iter().filter(|u| u.first("uid") == Some(uid));
		match (matches.next(), matches.next()) {
			(None, _) => Err(DirectoryError::NotFound(format!("user '{uid}'"))),
			(Some(entry), None) => Ok(entry.clone()),
			(Some(_), Some(_)) => Err(DirectoryError::MultipleFound(format!("uid '{uid}'"))),
		}
	}

	async fn add_user(&self, user: &NewDirectoryUser) -> Result<(), DirectoryError> {
		let mut state = self.state.lock().unwrap();
		if state
			.users
			.iter()
			.any(|u| u.first("uid") == Some(user.uid.as_str()))
		{
			return Err(DirectoryError::ConstraintViolation(
				"Already exists (rc=68)".to_string(),
			));
		}
		state.users.push(
			DirectoryEntry::new(Self::user_dn(&user.uid))
				.with_attr("uid", user.uid.clone())
				.with_attr("cn", user.common_name())
				.with_attr("givenName", user.given_name.clone())
				.with_attr("sn", user.surname.clone())
				.with_attr("objectClass", "inetOrgPerson"),
		);
		Ok(())
	}

	async fn get_user_groups(&self, uid: &str) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		let dn = Self::user_dn(uid);
		let state = self.state.lock().unwrap();
		Ok(state
			.groups
			.iter()
			.filter(|g| g.values(MEMBER_ATTRIBUTE).contains(&dn))
			.cloned()
			.collect())
	}

	async fn make_uid_member_of(
		&self,
		uid: &str,
		group_fqdn: &str,
	) -> Result<(), DirectoryError> {
		let dn = Self::user_dn(uid);
		let mut state = self.state.lock().unwrap();
		let group = state
			.groups
			.iter_mut()
			.find(|g| g.fqdn == group_fqdn)
			.ok_or_else(|| DirectoryError::ConstraintViolation("No such object (rc=32)".to_string()))?;
		let members = group
			.attributes
			.entry(MEMBER_ATTRIBUTE.to_string())
			.or_default();
		if members.contains(&dn) {
			return Err(DirectoryError::ConstraintViolation(
				"Type or value exists (rc=20)".to_string(),
			));
		}
		members.push(dn);
		Ok(())
	}

	async fn remove_uid_member_of(
		&self,
		uid: &str,
		group_fqdn: &str,
	) -> Result<(), DirectoryError> {
		let dn = Self::user_dn(uid);
		let mut state = self.state.lock().unwrap();
		let group = state
			.groups
			.iter_mut()
			.find(|g| g.fqdn == group_fqdn)
			.ok_or_else(|| DirectoryError::ConstraintViolation("No such object (rc=32)".to_string()))?;
		let members = group
			.attributes
			.entry(MEMBER_ATTRIBUTE.to_string())
			.or_default();
		let before = members.len();
		members.retain(|m| m != &dn);
		if members.len() == before {
			return Err(DirectoryError::ConstraintViolation(
				"No such attribute (rc=16)".to_string(),
			));
		}
		Ok(())
	}

	async fn get_groups(
		&self,
		filter: Option<GroupFilter>,
	) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		let state = self.state.lock().unwrap();
		Ok(state
			.groups
			.iter()
			.filter(|g| match &filter {
				Some(filter) => g.first("cn").is_some_and(|cn| filter.matches(cn)),
				None => true,
			})
			.cloned()
			.collect())
	}

	async fn get_org_units(&self, unit: OrgUnit) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		Ok(self
			.state
			.lock()
			.unwrap()
			.org_units
			.get(&unit)
			.cloned()
			.unwrap_or_default())
	}
}
