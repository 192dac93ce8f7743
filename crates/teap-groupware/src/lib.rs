// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Groupware (Nextcloud) client for the TEAP server.
//!
//! Covers user and group administration through the OCS provisioning API and
//! shared folders through the group-folders app. Every call returns a
//! [`GroupwareResponse`] carrying the OCS status; only transport and parse
//! failures become a [`GroupwareError`].

pub mod client;
pub mod error;
pub mod nextcloud;
pub mod response;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::GroupwareClient;
pub use error::GroupwareError;
pub use nextcloud::NextcloudClient;
pub use response::{GroupwareEnvelope, GroupwareResponse};
