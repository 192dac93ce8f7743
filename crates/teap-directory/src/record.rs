// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed records built from raw directory entries.
//!
//! Each record declares the attributes it reads. Those attributes are
//! expected to be single-valued (`uid`, `mail`, `cn`, `description`, `sn`,
//! `givenName`), so a list unpacks to its first element. Absent or empty
//! attributes leave the field unset; undeclared attributes are ignored.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::entry::DirectoryEntry;
use crate::error::RecordError;

/// Declared attributes, unpacked to scalars, keyed by attribute name.
pub type Unpacked = BTreeMap<&'static str, String>;

pub trait DirectoryRecord: Sized {
	/// Attributes this record reads, by directory name.
	const SINGLE_VALUE_FIELDS: &'static [&'static str];

	fn from_unpacked(fqdn: &str, fields: Unpacked) -> Self;

	fn load(entry: &DirectoryEntry) -> Result<Self, RecordError> {
		let fields = unpack(entry, Self::SINGLE_VALUE_FIELDS);
		Ok(Self::from_unpacked(&entry.fqdn, fields))
	}

	fn load_many(entries: &[DirectoryEntry]) -> Result<Vec<Self>, RecordError> {
		entries.iter().map(Self::load).collect()
	}

	/// Records are read-only views; writing back is not supported.
	fn to_directory_attributes(&self) -> Result<DirectoryEntry, RecordError> {
		Err(RecordError::DumpUnsupported)
	}
}

fn unpack(entry: &DirectoryEntry, fields: &[&'static str]) -> Unpacked {
	let mut unpacked = Unpacked::new();
	for &field in fields {
		let values = entry.values(field);
		let Some(first) = values.first() else {
			continue;
		};
		if values.len() > 1 {
			warn!(
				fqdn = %entry.fqdn,
				field,
				count = values.len(),
				"attribute holds several values, keeping the first"
			);
		}
		unpacked.insert(field, first.clone());
	}
	unpacked
}

fn non_empty(fqdn: &str) -> Option<String> {
	(!fqdn.is_empty()).then(|| fqdn.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryUser {
	pub uid: Option<String>,
	pub given_name: Option<String>,
	pub surname: Option<String>,
	pub mail: Option<String>,
	pub fqdn: Option<String>,
}

impl DirectoryRecord for DirectoryUser {
	const SINGLE_VALUE_FIELDS: &'static [&'static str] = &["uid", "givenName", "mail", "sn"];

	fn from_unpacked(fqdn: &str, mut fields: Unpacked) -> Self {
		Self {
			uid: fields.remove("uid"),
			given_name: fields.remove("givenName"),
			surname: fields.remove("sn"),
			mail: fields.remove("mail"),
			fqdn: non_empty(fqdn),
		}
	}
}

const ORG_UNIT_FIELDS: &[&str] = &["cn", "description"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Division {
	pub machine_name: Option<String>,
	pub display_name: Option<String>,
	pub fqdn: Option<String>,
}

impl DirectoryRecord for Division {
	const SINGLE_VALUE_FIELDS: &'static [&'static str] = ORG_UNIT_FIELDS;

	fn from_unpacked(fqdn: &str, mut fields: Unpacked) -> Self {
		Self {
			machine_name: fields.remove("cn"),
			display_name: fields.remove("description"),
			fqdn: non_empty(fqdn),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Franchise {
	pub machine_name: Option<String>,
	pub display_name: Option<String>,
	pub fqdn: Option<String>,
}

impl DirectoryRecord for Franchise {
	const SINGLE_VALUE_FIELDS: &'static [&'static str] = ORG_UNIT_FIELDS;

	fn from_unpacked(fqdn: &str, mut fields: Unpacked) -> Self {
		Self {
			machine_name: fields.remove("cn"),
			display_name: fields.remove("description"),
			fqdn: non_empty(fqdn),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Team {
	pub machine_name: Option<String>,
	pub display_name: Option<String>,
	pub fqdn: Option<String>,
}

impl DirectoryRecord for Team {
	const SINGLE_VALUE_FIELDS: &'static [&'static str] = ORG_UNIT_FIELDS;

	fn from_unpacked(fqdn: &str, mut fields: Unpacked) -> Self {
		Self {
			machine_name: fields.remove("cn"),
			display_name: fields.remove("description"),
			fqdn: non_empty(fqdn),
		}
	}
}
