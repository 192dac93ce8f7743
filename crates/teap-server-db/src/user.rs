// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local application accounts and their roles.
//!
//! These rows are independent of directory users; no HTTP handler manages
//! them yet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_unique_violation, DbError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	#[serde(skip)]
	pub password: Option<Vec<u8>>,
	pub created_at: DateTime<Utc>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub active: bool,
	pub is_admin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub password: Option<Vec<u8>>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
	pub id: i64,
	pub name: String,
	pub user_id: Option<i64>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &NewUser) -> Result<i64>;
	async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
	async fn create_role(&self, name: &str, user_id: Option<i64>) -> Result<i64>;
	async fn list_roles_for_user(&self, user_id: i64) -> Result<Vec<Role>>;
}

pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, user), fields(username = %user.username))]
	pub async fn create_user(&self, user: &NewUser) -> Result<i64> {
		let result = sqlx::query(
			r#"
			INSERT INTO users (username, email, password, created_at, first_name, last_name, active, is_admin)
			VALUES (?, ?, ?, ?, ?, ?, 1, ?)
			"#,
		)
		.bind(&user.username)
		.bind(&user.email)
		.bind(&user.password)
		.bind(Utc::now().to_rfc3339())
		.bind(&user.first_name)
		.bind(&user.last_name)
		.bind(user.is_admin)
		.execute(&self.pool)
		.await
		.map_err(|e| map_unique_violation(e, "user"))?;

		Ok(result.last_insert_rowid())
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
		let row = sqlx::query(
			"SELECT id, username, email, password, created_at, first_name, last_name, active, is_admin \
			 FROM users WHERE id = ?",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
		let row = sqlx::query(
			"SELECT id, username, email, password, created_at, first_name, last_name, active, is_admin \
			 FROM users WHERE username = ?",
		)
		.bind(username)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &NewUser) -> Result<i64> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
		self.get_user_by_username(username).await
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
	let created_at: String = row.get("created_at");
	let created_at = DateTime::parse_from_rfc3339(&created_at)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("invalid created_at: {e}")))?;

	Ok(User {
		id: row.get("id"),
		username: row.get("username"),
		email: row.get("email"),
		password: row.get("password"),
		created_at,
		first_name: row.get("first_name"),
		last_name: row.get("last_name"),
		active: row.get::<Option<bool>, _>("active").unwrap_or(false),
		is_admin: row.get::<Option<bool>, _>("is_admin").unwrap_or(false),
	})
}

pub struct RoleRepository {
	pool: SqlitePool,
}

impl RoleRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn create_role(&self, name: &str, user_id: Option<i64>) -> Result<i64> {
		let result = sqlx::query("INSERT INTO roles (name, user_id) VALUES (?, ?)")
			.bind(name)
			.bind(user_id)
			.execute(&self.pool)
			.await
			.map_err(|e| map_unique_violation(e, "role"))?;

		Ok(result.last_insert_rowid())
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_roles_for_user(&self, user_id: i64) -> Result<Vec<Role>> {
		let rows = sqlx::query("SELECT id, name, user_id FROM roles WHERE user_id = ? ORDER BY id")
			.bind(user_id)
			.fetch_all(&self.pool)
			.await?;

		Ok(rows
			.into_iter()
			.map(|row| Role {
				id: row.get("id"),
				name: row.get("name"),
				user_id: row.get("user_id"),
			})
			.collect())
	}
}

#[async_trait]
impl RoleStore for RoleRepository {
	async fn create_role(&self, name: &str, user_id: Option<i64>) -> Result<i64> {
		self.create_role(name, user_id).await
	}

	async fn list_roles_for_user(&self, user_id: i64) -> Result<Vec<Role>> {
		self.list_roles_for_user(user_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	fn new_user(username: &str) -> NewUser {
		NewUser {
			username: username.to_string(),
			email: format!("{username}@example.org"),
			first_name: Some("Jane".to_string()),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn create_and_get_user() {
		let repo = UserRepository::new(create_test_pool().await);
		let id = repo.create_user(&new_user("jdoe")).await.unwrap();

		let user = repo.get_user_by_id(id).await.unwrap().unwrap();
		assert_eq!(user.username, "jdoe");
		assert!(user.active);
		assert!(!user.is_admin);

		let same = repo.get_user_by_username("jdoe").await.unwrap().unwrap();
		assert_eq!(same.id, id);
		assert!(repo.get_user_by_username("nobody").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn duplicate_username_conflicts() {
		let repo = UserRepository::new(create_test_pool().await);
		repo.create_user(&new_user("jdoe")).await.unwrap();
		let err = repo.create_user(&new_user("jdoe")).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)));
	}

	#[tokio::test]
	async fn roles_belong_to_users() {
		let pool = create_test_pool().await;
		let users = UserRepository::new(pool.clone());
		let roles = RoleRepository::new(pool);

		let id = users.create_user(&new_user("admin")).await.unwrap();
		roles.create_role("admin", Some(id)).await.unwrap();
		roles.create_role("orphan", None).await.unwrap();

		let assigned = roles.list_roles_for_user(id).await.unwrap();
		assert_eq!(assigned.len(), 1);
		assert_eq!(assigned[0].name, "admin");

		let err = roles.create_role("admin", None).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)));
	}
}
