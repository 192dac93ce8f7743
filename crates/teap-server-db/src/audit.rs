// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read side of the audit log. Rows are written by `SqliteAuditSink`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};
use teap_server_audit::AuditEventKind;

use crate::error::{DbError, Result};

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 500;

/// A stored audit event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
	pub id: i64,
	pub event: AuditEventKind,
	pub timestamp: Option<DateTime<Utc>>,
	pub data: serde_json::Value,
	pub message: Option<String>,
	pub success: bool,
}

#[async_trait]
pub trait AuditStore: Send + Sync {
	async fn list(&self, kind: Option<AuditEventKind>, limit: Option<i64>)
		-> Result<Vec<AuditRecord>>;
	async fn count(&self, kind: Option<AuditEventKind>) -> Result<i64>;
}

pub struct AuditRepository {
	pool: SqlitePool,
}

impl AuditRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Newest first. `limit` defaults to 50 and is clamped to `1..=500`.
	#[tracing::instrument(skip(self))]
	pub async fn list(
		&self,
		kind: Option<AuditEventKind>,
		limit: Option<i64>,
	) -> Result<Vec<AuditRecord>> {
		let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

		let rows = match kind {
			Some(kind) => {
				sqlx::query(
					"SELECT id, event, timestamp, data, message, success FROM action \
					 WHERE event = ? ORDER BY id DESC LIMIT ?",
				)
				.bind(kind.as_str())
				.bind(limit)
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query(
					"SELECT id, event, timestamp, data, message, success FROM action \
					 ORDER BY id DESC LIMIT ?",
				)
				.bind(limit)
				.fetch_all(&self.pool)
				.await?
			}
		};

		rows.into_iter().map(|row| row_to_record(&row)).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count(&self, kind: Option<AuditEventKind>) -> Result<i64> {
		let row = match kind {
			Some(kind) => {
				sqlx::query("SELECT COUNT(*) AS cnt FROM action WHERE event = ?")
					.bind(kind.as_str())
					.fetch_one(&self.pool)
					.await?
			}
			None => {
				sqlx::query("SELECT COUNT(*) AS cnt FROM action")
					.fetch_one(&self.pool)
					.await?
			}
		};
		Ok(row.get("cnt"))
	}
}

#[async_trait]
impl AuditStore for AuditRepository {
	async fn list(
		&self,
		kind: Option<AuditEventKind>,
		limit: Option<i64>,
	) -> Result<Vec<AuditRecord>> {
		self.list(kind, limit).await
	}

	async fn count(&self, kind: Option<AuditEventKind>) -> Result<i64> {
		self.count(kind).await
	}
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<AuditRecord> {
	let event_str: String = row.get("event");
	let event = event_str
		.parse::<AuditEventKind>()
		.map_err(|e| DbError::Internal(e.to_string()))?;

	let timestamp = row
		.get::<Option<String>, _>("timestamp")
		.and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
		.map(|dt| dt.with_timezone(&Utc));

	let data = match row.get::<Option<String>, _>("data") {
		Some(raw) => serde_json::from_str(&raw)?,
		None => serde_json::Value::Null,
	};

	Ok(AuditRecord {
		id: row.get("id"),
		event,
		timestamp,
		data,
		message: row.get("message"),
		success: row.get("success"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use proptest::prelude::*;
	use teap_server_audit::{AuditEvent, AuditSink, SqliteAuditSink};

	async fn seed(pool: &SqlitePool, events: &[(AuditEventKind, bool)]) {
		let sink = SqliteAuditSink::new(pool.clone());
		for (kind, success) in events {
			let event = AuditEvent::builder(*kind)
				.success(*success)
				.payload(serde_json::json!({"n": 1}))
				.build();
			sink.publish(&event).await.unwrap();
		}
	}

	#[tokio::test]
	async fn lists_newest_first() {
		let pool = create_test_pool().await;
		seed(
			&pool,
			&[
				(AuditEventKind::CreateChatUser, true),
				(AuditEventKind::CreateChatChannel, false),
			],
		)
		.await;

		let repo = AuditRepository::new(pool);
		let records = repo.list(None, None).await.unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].event, AuditEventKind::CreateChatChannel);
		assert!(!records[0].success);
		assert_eq!(records[1].data["n"], 1);
		assert!(records[1].timestamp.is_some());
	}

	#[tokio::test]
	async fn filters_by_kind() {
		let pool = create_test_pool().await;
		seed(
			&pool,
			&[
				(AuditEventKind::CreateChatUser, true),
				(AuditEventKind::DirectoryUserCreated, true),
				(AuditEventKind::CreateChatUser, false),
			],
		)
		.await;

		let repo = AuditRepository::new(pool);
		let records = repo
			.list(Some(AuditEventKind::CreateChatUser), None)
			.await
			.unwrap();
		assert_eq!(records.len(), 2);
		assert!(records
			.iter()
			.all(|r| r.event == AuditEventKind::CreateChatUser));
		assert_eq!(
			repo.count(Some(AuditEventKind::DirectoryUserCreated))
				.await
				.unwrap(),
			1
		);
	}

	#[tokio::test]
	async fn empty_log_lists_nothing() {
		let repo = AuditRepository::new(create_test_pool().await);
		assert!(repo.list(None, Some(10)).await.unwrap().is_empty());
		assert_eq!(repo.count(None).await.unwrap(), 0);
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(16))]
		#[test]
		fn limit_is_respected(inserted in 0usize..12, limit in -3i64..20) {
			let rt = tokio::runtime::Runtime::new().unwrap();
			rt.block_on(async {
				let pool = create_test_pool().await;
				let events: Vec<_> = (0..inserted)
					.map(|_| (AuditEventKind::CreateChatChannel, true))
					.collect();
				seed(&pool, &events).await;

				let repo = AuditRepository::new(pool);
				let records = repo.list(None, Some(limit)).await.unwrap();
				let expected = inserted.min(limit.clamp(1, MAX_LIST_LIMIT) as usize);
				assert_eq!(records.len(), expected);
			});
		}
	}
}
