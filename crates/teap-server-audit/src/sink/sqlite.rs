// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AuditSinkError;
use crate::event::AuditEvent;
use crate::sink::AuditSink;

/// Appends events to the `action` table.
pub struct SqliteAuditSink {
	pool: SqlitePool,
}

impl SqliteAuditSink {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
	fn name(&self) -> &str {
		"sqlite"
	}

	async fn publish(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
		let data_json = serde_json::to_string(&event.data)
			.map_err(|e| AuditSinkError::Permanent(format!("failed to serialize data: {e}")))?;

		sqlx::query(
			r#"
			INSERT INTO action (event, timestamp, data, message, success)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(event.kind.as_str())
		.bind(event.timestamp.to_rfc3339())
		.bind(&data_json)
		.bind(&event.message)
		.bind(event.success)
		.execute(&self.pool)
		.await
		.map_err(|e| {
			if is_transient_error(&e) {
				AuditSinkError::Transient(format!("database error: {e}"))
			} else {
				AuditSinkError::Permanent(format!("database error: {e}"))
			}
		})?;

		Ok(())
	}

	async fn health_check(&self) -> Result<(), AuditSinkError> {
		sqlx::query("SELECT 1")
			.execute(&self.pool)
			.await
			.map_err(|e| AuditSinkError::Transient(format!("health check failed: {e}")))?;
		Ok(())
	}
}

fn is_transient_error(e: &sqlx::Error) -> bool {
	match e {
		sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => true,
		sqlx::Error::Database(db_err) => {
			let msg = db_err.message().to_lowercase();
			msg.contains("busy") || msg.contains("locked")
		}
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::AuditEventKind;
	use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
	use sqlx::Row;
	use std::str::FromStr;

	async fn pool_with_action_table() -> SqlitePool {
		let options = SqliteConnectOptions::from_str(":memory:").unwrap();
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect_with(options)
			.await
			.unwrap();
		sqlx::query(
			"CREATE TABLE action (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				event VARCHAR(50) NOT NULL,
				timestamp TEXT,
				data TEXT,
				message VARCHAR(500),
				success BOOLEAN NOT NULL
			)",
		)
		.execute(&pool)
		.await
		.unwrap();
		pool
	}

	#[tokio::test]
	async fn inserts_one_row_per_event() {
		let pool = pool_with_action_table().await;
		let sink = SqliteAuditSink::new(pool.clone());

		let event = AuditEvent::builder(AuditEventKind::CreateChatChannel)
			.success(true)
			.payload(serde_json::json!({"channel_name": "general"}))
			.build();
		sink.publish(&event).await.unwrap();

		let row = sqlx::query("SELECT event, data, success FROM action")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(row.get::<String, _>("event"), "create_chat_channel");
		assert!(row.get::<bool, _>("success"));
		let data: serde_json::Value =
			serde_json::from_str(&row.get::<String, _>("data")).unwrap();
		assert_eq!(data["channel_name"], "general");
	}

	#[tokio::test]
	async fn missing_table_is_permanent() {
		let options = SqliteConnectOptions::from_str(":memory:").unwrap();
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect_with(options)
			.await
			.unwrap();
		let sink = SqliteAuditSink::new(pool);

		let event = AuditEvent::builder(AuditEventKind::CreateChatUser).build();
		let err = sink.publish(&event).await.unwrap_err();
		assert!(matches!(err, AuditSinkError::Permanent(_)));
	}
}
