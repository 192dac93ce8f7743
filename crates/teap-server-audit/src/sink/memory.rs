// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collecting sink for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{AuditSink, AuditSinkError};
use crate::event::{AuditEvent, AuditEventKind};

#[derive(Debug, Default)]
pub struct MemoryAuditSink {
	events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> Vec<AuditEvent> {
		self.events.lock().unwrap().clone()
	}

	pub fn events_of(&self, kind: AuditEventKind) -> Vec<AuditEvent> {
		self.events()
			.into_iter()
			.filter(|e| e.kind == kind)
			.collect()
	}
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
	fn name(&self) -> &str {
		"memory"
	}

	async fn publish(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
		self.events.lock().unwrap().push(event.clone());
		Ok(())
	}
}
