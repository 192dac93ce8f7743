// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use super::{AuditSink, AuditSinkError};
use crate::event::AuditEvent;

/// Emits each event as a structured `tracing` record under the `teap_audit`
/// target. Failed side effects are logged at WARN.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl AuditSink for TracingAuditSink {
	fn name(&self) -> &str {
		"tracing"
	}

	async fn publish(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
		let kind = event.kind.as_str();
		let timestamp = event.timestamp.to_rfc3339();
		let message = event.message.as_deref();
		let data = if event.data.is_null() {
			None
		} else {
			Some(event.data.to_string())
		};

		if event.success {
			tracing::info!(
				target: "teap_audit",
				kind,
				timestamp,
				success = event.success,
				message,
				data,
				"audit event"
			);
		} else {
			tracing::warn!(
				target: "teap_audit",
				kind,
				timestamp,
				success = event.success,
				message,
				data,
				"audit event"
			);
		}

		Ok(())
	}
}
