// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ldap3` implementation of [`DirectoryClient`].
//!
//! Every operation opens a connection, binds with the service account, runs,
//! and unbinds. There is no pooling.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{dn_escape, ldap_escape, Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry};
use teap_server_config::DirectoryConfig;
use tracing::{debug, instrument, warn};

use crate::client::{DirectoryClient, GroupFilter, NewDirectoryUser, OrgUnit};
use crate::entry::DirectoryEntry;
use crate::error::DirectoryError;

/// Result codes treated as a refused change rather than a server fault:
/// noSuchAttribute, constraintViolation, attributeOrValueExists,
/// invalidAttributeSyntax, noSuchObject, objectClassViolation, entryAlreadyExists.
const CONSTRAINT_RESULT_CODES: &[u32] = &[16, 19, 20, 21, 32, 65, 68];

const USER_OBJECT_CLASSES: &[&str] = &["top", "person", "organizationalPerson", "inetOrgPerson"];

pub struct LdapDirectoryClient {
	config: DirectoryConfig,
}

impl LdapDirectoryClient {
	pub fn new(config: DirectoryConfig) -> Self {
		Self { config }
	}

	fn container(&self, ou: &str) -> String {
		format!("{},{}", ou, self.config.base_dn)
	}

	fn users_base(&self) -> String {
		self.container(&self.config.users_ou)
	}

	fn groups_base(&self) -> String {
		self.container(&self.config.groups_ou)
	}

	fn org_unit_base(&self, unit: OrgUnit) -> String {
		let ou = match unit {
			OrgUnit::Divisions => &self.config.divisions_ou,
			OrgUnit::Franchises => &self.config.franchises_ou,
			OrgUnit::Teams => &self.config.teams_ou,
		};
		self.container(ou)
	}

	pub fn user_dn(&self, uid: &str) -> String {
		format!("uid={},{}", dn_escape(uid), self.users_base())
	}

	async fn connect(&self) -> Result<Ldap, DirectoryError> {
		let settings = LdapConnSettings::new()
			.set_conn_timeout(Duration::from_secs(self.config.connect_timeout_secs));

		let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.url)
			.await
			.map_err(|e| DirectoryError::Connection(e.to_string()))?;

		tokio::spawn(async move {
			if let Err(e) = conn.drive().await {
				warn!(error = %e, "LDAP connection driver error");
			}
		});

		ldap
			.simple_bind(&self.config.bind_dn, self.config.password.expose())
			.await
			.map_err(|e| DirectoryError::Connection(e.to_string()))?
			.success()
			.map_err(|e| DirectoryError::Connection(format!("bind failed: {e}")))?;

		Ok(ldap)
	}

	async fn search(
		&self,
		base: &str,
		filter: &str,
	) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		let mut ldap = self.connect().await?;
		debug!(base, filter, "directory search");

		let result = match ldap.search(base, Scope::OneLevel, filter, vec!["*"]).await {
			Ok(result) => result.success().map_err(map_ldap_error),
			Err(e) => Err(map_ldap_error(e)),
		};
		release(ldap).await;

		let (entries, _) = result?;
		Ok(entries
			.into_iter()
			.map(SearchEntry::construct)
			.map(DirectoryEntry::from)
			.collect())
	}

	async fn modify_member(
		&self,
		group_fqdn: &str,
		change: Mod<String>,
	) -> Result<(), DirectoryError> {
		let mut ldap = self.connect().await?;

		let result = match ldap.modify(group_fqdn, vec![change]).await {
			Ok(result) => result.success().map(|_| ()).map_err(map_ldap_error),
			Err(e) => Err(map_ldap_error(e)),
		};
		release(ldap).await;
		result
	}

	fn member_values(&self, uid: &str) -> HashSet<String> {
		HashSet::from([self.user_dn(uid)])
	}
}

/// Ends the session. The operation result is already in hand, so a failed
/// unbind is only logged.
async fn release(mut ldap: Ldap) {
	if let Err(e) = ldap.unbind().await {
		debug!(error = %e, "LDAP unbind failed");
	}
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
	#[instrument(skip(self))]
	async fn get_users(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		self.search(&self.users_base(), "(uid=*)").await
	}

	#[instrument(skip(self))]
	async fn get_user(&self, uid: &str) -> Result<DirectoryEntry, DirectoryError> {
		let filter = format!("(uid={})", ldap_escape(uid));
		let mut entries = self.search(&self.users_base(), &filter).await?;
		match entries.len() {
			0 => Err(DirectoryError::NotFound(format!("user '{uid}'"))),
			1 => Ok(entries.remove(0)),
			_ => Err(DirectoryError::MultipleFound(format!("uid '{uid}'"))),
		}
	}

	#[instrument(skip(self, user), fields(uid = %user.uid))]
	async fn add_user(&self, user: &NewDirectoryUser) -> Result<(), DirectoryError> {
		let dn = self.user_dn(&user.uid);
		let attrs = new_user_attributes(user);

		let mut ldap = self.connect().await?;
		let result = match ldap.add(&dn, attrs).await {
			Ok(result) => result.success().map(|_| ()).map_err(map_ldap_error),
			Err(e) => Err(map_ldap_error(e)),
		};
		release(ldap).await;
		result
	}

	#[instrument(skip(self))]
	async fn get_user_groups(&self, uid: &str) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		let filter = format!(
			"({}={})",
			self.config.member_attribute,
			ldap_escape(&self.user_dn(uid))
		);
		self.search(&self.groups_base(), &filter).await
	}

	#[instrument(skip(self))]
	async fn make_uid_member_of(
		&self,
		uid: &str,
		group_fqdn: &str,
	) -> Result<(), DirectoryError> {
		let change = Mod::Add(self.config.member_attribute.clone(), self.member_values(uid));
		self.modify_member(group_fqdn, change).await
	}

	#[instrument(skip(self))]
	async fn remove_uid_member_of(
		&self,
		uid: &str,
		group_fqdn: &str,
	) -> Result<(), DirectoryError> {
		let change = Mod::Delete(self.config.member_attribute.clone(), self.member_values(uid));
		self.modify_member(group_fqdn, change).await
	}

	#[instrument(skip(self))]
	async fn get_groups(
		&self,
		filter: Option<GroupFilter>,
	) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		self.search(&self.groups_base(), &group_filter(filter.as_ref()))
			.await
	}

	#[instrument(skip(self))]
	async fn get_org_units(&self, unit: OrgUnit) -> Result<Vec<DirectoryEntry>, DirectoryError> {
		self.search(&self.org_unit_base(unit), "(objectClass=*)").await
	}
}

fn group_filter(filter: Option<&GroupFilter>) -> String {
	match filter {
		Some(GroupFilter::CnPrefix(prefix)) => format!("(cn={}*)", ldap_escape(prefix)),
		Some(GroupFilter::CnEquals(name)) => format!("(cn={})", ldap_escape(name)),
		None => "(cn=*)".to_string(),
	}
}

fn new_user_attributes(user: &NewDirectoryUser) -> Vec<(String, HashSet<String>)> {
	let single = |value: &str| HashSet::from([value.to_string()]);
	vec![
		(
			"objectClass".to_string(),
			USER_OBJECT_CLASSES.iter().map(|c| c.to_string()).collect(),
		),
		("uid".to_string(), single(&user.uid)),
		("cn".to_string(), single(&user.common_name())),
		("givenName".to_string(), single(&user.given_name)),
		("sn".to_string(), single(&user.surname)),
		("userPassword".to_string(), single(user.password.expose())),
	]
}

fn map_ldap_error(err: ldap3::LdapError) -> DirectoryError {
	match err {
		ldap3::LdapError::LdapResult { result } => map_result_code(result.rc, &result.text),
		other => DirectoryError::Connection(other.to_string()),
	}
}

fn map_result_code(rc: u32, text: &str) -> DirectoryError {
	let message = if text.is_empty() {
		format!("LDAP result code {rc}")
	} else {
		format!("{text} (rc={rc})")
	};
	if CONSTRAINT_RESULT_CODES.contains(&rc) {
		DirectoryError::ConstraintViolation(message)
	} else {
		DirectoryError::Upstream(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use teap_common_config::SecretString;

	fn client() -> LdapDirectoryClient {
		LdapDirectoryClient::new(DirectoryConfig {
			url: "ldap://127.0.0.1:1".to_string(),
			bind_dn: "cn=admin,dc=example,dc=org".to_string(),
			password: SecretString::new("secret".to_string()),
			base_dn: "dc=example,dc=org".to_string(),
			users_ou: "ou=People".to_string(),
			groups_ou: "ou=Groups".to_string(),
			divisions_ou: "ou=Divisions".to_string(),
			franchises_ou: "ou=Franchises".to_string(),
			teams_ou: "ou=Teams".to_string(),
			member_attribute: "uniqueMember".to_string(),
			connect_timeout_secs: 1,
		})
	}

	#[test]
	fn builds_user_dn_under_users_ou() {
		assert_eq!(
			client().user_dn("jdoe"),
			"uid=jdoe,ou=People,dc=example,dc=org"
		);
	}

	#[test]
	fn user_dn_escapes_special_characters() {
		let dn = client().user_dn("doe,jane");
		assert!(dn.starts_with("uid=doe\\"));
		assert!(!dn.contains("doe,jane"));
		assert!(dn.ends_with(",ou=People,dc=example,dc=org"));
	}

	#[test]
	fn org_unit_bases() {
		let client = client();
		assert_eq!(
			client.org_unit_base(OrgUnit::Divisions),
			"ou=Divisions,dc=example,dc=org"
		);
		assert_eq!(
			client.org_unit_base(OrgUnit::Teams),
			"ou=Teams,dc=example,dc=org"
		);
	}

	#[test]
	fn prefix_filter_escapes_value_but_keeps_wildcard() {
		assert_eq!(
			group_filter(Some(&GroupFilter::CnPrefix("a*(b)".to_string()))).to_lowercase(),
			"(cn=a\\2a\\28b\\29*)"
		);
		assert_eq!(
			group_filter(Some(&GroupFilter::CnEquals("ops".to_string()))),
			"(cn=ops)"
		);
		assert_eq!(group_filter(None), "(cn=*)");
	}

	#[test]
	fn constraint_codes_map_to_constraint_violation() {
		for rc in CONSTRAINT_RESULT_CODES {
			assert!(matches!(
				map_result_code(*rc, "refused"),
				DirectoryError::ConstraintViolation(_)
			));
		}
		assert!(matches!(
			map_result_code(50, "insufficientAccessRights"),
			DirectoryError::Upstream(_)
		));
	}

	#[test]
	fn new_user_is_inet_org_person_with_full_cn() {
		let attrs = new_user_attributes(&NewDirectoryUser {
			uid: "jdoe".to_string(),
			given_name: "Jane".to_string(),
			surname: "Doe".to_string(),
			password: SecretString::new("pw".to_string()),
		});
		let get = |name: &str| {
			attrs
				.iter()
				.find(|(attr, _)| attr == name)
				.map(|(_, values)| values.clone())
				.unwrap()
		};
		assert!(get("objectClass").contains("inetOrgPerson"));
		assert!(get("cn").contains("Jane Doe"));
		assert!(get("sn").contains("Doe"));
	}

	#[tokio::test]
	async fn unreachable_server_is_a_connection_error() {
		let err = client().get_users().await.unwrap_err();
		assert!(matches!(err, DirectoryError::Connection(_)));
	}

	#[tokio::test]
	async fn release_returns_when_server_already_hung_up() {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let url = format!("ldap://{}", listener.local_addr().unwrap());
		let accept = tokio::spawn(async move {
			let (stream, _) = listener.accept().await.unwrap();
			drop(stream);
		});

		let (conn, ldap) = LdapConnAsync::new(&url).await.unwrap();
		accept.await.unwrap();
		let _ = conn.drive().await;

		tokio::time::timeout(std::time::Duration::from_secs(5), release(ldap))
			.await
			.unwrap();
	}
}
