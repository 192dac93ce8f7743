// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory (LDAP) connection settings.

use serde::Deserialize;
use teap_common_config::SecretString;

const DEFAULT_USERS_OU: &str = "ou=People";
const DEFAULT_GROUPS_OU: &str = "ou=Groups";
const DEFAULT_DIVISIONS_OU: &str = "ou=Divisions";
const DEFAULT_FRANCHISES_OU: &str = "ou=Franchises";
const DEFAULT_TEAMS_OU: &str = "ou=Teams";
const DEFAULT_MEMBER_ATTRIBUTE: &str = "uniqueMember";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Resolved directory settings. Only built when url, bind DN, base DN and the
/// bind password are all present.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
	pub url: String,
	pub bind_dn: String,
	pub password: SecretString,
	pub base_dn: String,
	pub users_ou: String,
	pub groups_ou: String,
	pub divisions_ou: String,
	pub franchises_ou: String,
	pub teams_ou: String,
	pub member_attribute: String,
	pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub bind_dn: Option<String>,
	#[serde(default)]
	pub base_dn: Option<String>,
	#[serde(default)]
	pub users_ou: Option<String>,
	#[serde(default)]
	pub groups_ou: Option<String>,
	#[serde(default)]
	pub divisions_ou: Option<String>,
	#[serde(default)]
	pub franchises_ou: Option<String>,
	#[serde(default)]
	pub teams_ou: Option<String>,
	#[serde(default)]
	pub member_attribute: Option<String>,
	#[serde(default)]
	pub connect_timeout_secs: Option<u64>,
}

impl DirectoryConfigLayer {
	pub fn merge(&mut self, other: DirectoryConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.bind_dn.is_some() {
			self.bind_dn = other.bind_dn;
		}
		if other.base_dn.is_some() {
			self.base_dn = other.base_dn;
		}
		if other.users_ou.is_some() {
			self.users_ou = other.users_ou;
		}
		if other.groups_ou.is_some() {
			self.groups_ou = other.groups_ou;
		}
		if other.divisions_ou.is_some() {
			self.divisions_ou = other.divisions_ou;
		}
		if other.franchises_ou.is_some() {
			self.franchises_ou = other.franchises_ou;
		}
		if other.teams_ou.is_some() {
			self.teams_ou = other.teams_ou;
		}
		if other.member_attribute.is_some() {
			self.member_attribute = other.member_attribute;
		}
		if other.connect_timeout_secs.is_some() {
			self.connect_timeout_secs = other.connect_timeout_secs;
		}
	}

	pub fn finalize(self, password: Option<SecretString>) -> Option<DirectoryConfig> {
		Some(DirectoryConfig {
			url: self.url?,
			bind_dn: self.bind_dn?,
			password: password?,
			base_dn: self.base_dn?,
			users_ou: self.users_ou.unwrap_or_else(|| DEFAULT_USERS_OU.to_string()),
			groups_ou: self
				.groups_ou
				.unwrap_or_else(|| DEFAULT_GROUPS_OU.to_string()),
			divisions_ou: self
				.divisions_ou
				.unwrap_or_else(|| DEFAULT_DIVISIONS_OU.to_string()),
			franchises_ou: self
				.franchises_ou
				.unwrap_or_else(|| DEFAULT_FRANCHISES_OU.to_string()),
			teams_ou: self.teams_ou.unwrap_or_else(|| DEFAULT_TEAMS_OU.to_string()),
			member_attribute: self
				.member_attribute
				.unwrap_or_else(|| DEFAULT_MEMBER_ATTRIBUTE.to_string()),
			connect_timeout_secs: self
				.connect_timeout_secs
				.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn complete_layer() -> DirectoryConfigLayer {
		DirectoryConfigLayer {
			url: Some("ldap://ldap.example.org:389".to_string()),
			bind_dn: Some("cn=admin,dc=example,dc=org".to_string()),
			base_dn: Some("dc=example,dc=org".to_string()),
			..Default::default()
		}
	}

	#[test]
	fn requires_password() {
		assert!(complete_layer().finalize(None).is_none());
	}

	#[test]
	fn fills_default_ous() {
		let config = complete_layer()
			.finalize(Some(SecretString::new("pw".to_string())))
			.unwrap();
		assert_eq!(config.users_ou, "ou=People");
		assert_eq!(config.groups_ou, "ou=Groups");
		assert_eq!(config.member_attribute, "uniqueMember");
	}

	#[test]
	fn missing_url_disables_directory() {
		let layer = DirectoryConfigLayer {
			url: None,
			..complete_layer()
		};
		assert!(layer
			.finalize(Some(SecretString::new("pw".to_string())))
			.is_none());
	}
}
