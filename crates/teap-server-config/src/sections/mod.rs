// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each has a resolved `*Config` and a mergeable
//! `*ConfigLayer` whose fields are all optional.

mod audit;
mod chat;
mod database;
mod directory;
mod groupware;
mod http;
mod logging;

pub use audit::{AuditConfig, AuditConfigLayer};
pub use chat::{ChatConfig, ChatConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use directory::{DirectoryConfig, DirectoryConfigLayer};
pub use groupware::{GroupwareConfig, GroupwareConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
