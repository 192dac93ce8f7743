// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::event::{AuditEvent, AuditEventKind};
use crate::sink::{AuditSink, AuditSinkError};
use teap_server_config::AuditConfig;

/// Publishes events to every sink in order, inline with the caller.
///
/// A failing sink is logged and skipped; the remaining sinks still receive the
/// event and the caller never sees the error.
#[derive(Clone)]
pub struct AuditService {
	sinks: Arc<Vec<Arc<dyn AuditSink>>>,
	enabled: bool,
}

impl AuditService {
	pub fn new(config: &AuditConfig, sinks: Vec<Arc<dyn AuditSink>>) -> Self {
		Self {
			sinks: Arc::new(sinks),
			enabled: config.enabled,
		}
	}

	/// A service that drops every event.
	pub fn disabled() -> Self {
		Self {
			sinks: Arc::new(Vec::new()),
			enabled: false,
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub async fn record(&self, kind: AuditEventKind, success: bool, payload: serde_json::Value) {
		let event = AuditEvent::builder(kind)
			.success(success)
			.payload(payload)
			.build();
		self.log(event).await;
	}

	#[instrument(skip(self, event), fields(kind = %event.kind, success = event.success))]
	pub async fn log(&self, event: AuditEvent) {
		if !self.enabled {
			return;
		}

		for sink in self.sinks.iter() {
			if let Err(e) = sink.publish(&event).await {
				warn!(sink = sink.name(), error = %e, "audit sink publish failed");
			}
		}
	}

	/// Checks every sink; the first failure is returned. A disabled service is
	/// always healthy.
	pub async fn health_check(&self) -> Result<(), AuditSinkError> {
		if !self.enabled {
			return Ok(());
		}

		for sink in self.sinks.iter() {
			if let Err(e) = sink.health_check().await {
				warn!(sink = sink.name(), error = %e, "audit sink unhealthy");
				return Err(e);
			}
		}
		Ok(())
	}
}

impl std::fmt::Debug for AuditService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
		f.debug_struct("AuditService")
			.field("sinks", &names)
			.field("enabled", &self.enabled)
			.finish()
	}
}
