// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit log for significant external side effects.
//!
//! Events are built with [`AuditEvent::builder`] and handed to an
//! [`AuditService`], which publishes them to every configured [`AuditSink`] in
//! order. Sink failures are logged and never reach the caller.

pub mod error;
pub mod event;
pub mod service;
pub mod sink;

pub use error::AuditSinkError;
pub use event::{AuditEvent, AuditEventBuilder, AuditEventKind, MAX_MESSAGE_LEN};
pub use service::AuditService;
pub use sink::AuditSink;

pub use teap_server_config::AuditConfig;

#[cfg(feature = "sink-sqlite")]
pub use sink::sqlite::SqliteAuditSink;

#[cfg(feature = "sink-tracing")]
pub use sink::tracing::TracingAuditSink;

#[cfg(any(test, feature = "testing"))]
pub use sink::memory::MemoryAuditSink;
