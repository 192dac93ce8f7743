// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw directory object: its DN plus every attribute as a list of values.
///
/// Serializes flat, e.g. `{"fqdn": "cn=admins,ou=Groups,...", "cn": ["admins"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
	pub fqdn: String,
	#[serde(flatten)]
	pub attributes: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
	pub fn new(fqdn: impl Into<String>) -> Self {
		Self {
			fqdn: fqdn.into(),
			attributes: BTreeMap::new(),
		}
	}

	/// Builder-style helper that appends one value to `name`.
	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self
			.attributes
			.entry(name.into())
			.or_default()
			.push(value.into());
		self
	}

	pub fn values(&self, name: &str) -> &[String] {
		self.attributes.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn first(&self, name: &str) -> Option<&str> {
		self.values(name).first().map(String::as_str)
	}
}

impl From<ldap3::SearchEntry> for DirectoryEntry {
	fn from(entry: ldap3::SearchEntry) -> Self {
		Self {
			fqdn: entry.dn,
			attributes: entry.attrs.into_iter().collect(),
		}
	}
}
