// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # teap-server-db
//!
//! SQLite persistence for the TEAP server via sqlx.
//!
//! Each domain has a `*Store` trait and a `*Repository` struct holding a
//! `SqlitePool`; the trait impls delegate to inherent methods. Lookups where
//! absence is normal return `Result<Option<T>>`; unique-constraint failures
//! surface as [`DbError::Conflict`].
//!
//! The schema lives in `migrations/` and is applied by [`run_migrations`].

pub mod audit;
mod error;
pub mod pool;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use audit::{AuditRecord, AuditRepository, AuditStore, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
pub use error::{DbError, Result};
pub use pool::{create_pool, ping, run_migrations};
pub use user::{NewUser, Role, RoleRepository, RoleStore, User, UserRepository, UserStore};

pub use sqlx::SqlitePool;
