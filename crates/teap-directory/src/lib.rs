// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory access for the TEAP server.
//!
//! - [`DirectoryClient`]: the operations handlers need, object-safe
//! - [`LdapDirectoryClient`]: `ldap3` implementation, one connection per call
//! - [`DirectoryRecord`]: typed views over raw [`DirectoryEntry`] results

pub mod client;
pub mod entry;
pub mod error;
pub mod ldap;
pub mod record;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{DirectoryClient, GroupFilter, NewDirectoryUser, OrgUnit};
pub use entry::DirectoryEntry;
pub use error::{DirectoryError, RecordError};
pub use ldap::LdapDirectoryClient;
pub use record::{DirectoryRecord, DirectoryUser, Division, Franchise, Team};
