// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router-level tests against in-memory collaborators.
//!
//! Tests cover:
//! - User and membership handlers over the directory
//! - Group handlers, bulk delete and subadmins over the groupware
//! - Group-with-folder provisioning and its rollback
//! - Chat handlers and their audit events
//! - Audit listing, health and unconfigured collaborators

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use teap_chat::testing::ScriptedChat;
use teap_chat::ChatService;
use teap_directory::testing::InMemoryDirectory;
use teap_directory::{DirectoryEntry, OrgUnit};
use teap_groupware::testing::InMemoryGroupware;
use teap_server::{create_router, AppState};
use teap_server_audit::{AuditConfig, AuditEventKind, AuditService, SqliteAuditSink};
use teap_server_db::testing::create_test_pool;
use teap_server_db::{AuditRepository, SqlitePool};
use tower::ServiceExt;

struct TestApp {
	router: Router,
	directory: Arc<InMemoryDirectory>,
	groupware: Arc<InMemoryGroupware>,
	pool: SqlitePool,
}

async fn setup(
	directory: InMemoryDirectory,
	groupware: InMemoryGroupware,
	chat: ScriptedChat,
) -> TestApp {
	let pool = create_test_pool().await;
	let audit = AuditService::new(
		&AuditConfig { enabled: true },
		vec![Arc::new(SqliteAuditSink::new(pool.clone()))],
	);
	let directory = Arc::new(directory);
	let groupware = Arc::new(groupware);
	let state = AppState::new(pool.clone(), audit.clone())
		.with_directory(directory.clone())
		.with_groupware(groupware.clone())
		.with_chat(ChatService::new(Arc::new(chat), audit));

	TestApp {
		router: create_router(state),
		directory,
		groupware,
		pool,
	}
}

async fn default_app() -> TestApp {
	setup(
		InMemoryDirectory::new(),
		InMemoryGroupware::new(),
		ScriptedChat::new(),
	)
	.await
}

impl TestApp {
	async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
		let mut builder = Request::builder().method(method).uri(uri);
		let body = match body {
			Some(json) => {
				builder = builder.header("content-type", "application/json");
				Body::from(json.to_string())
			}
			None => Body::empty(),
		};

		let response = self
			.router
			.clone()
			.oneshot(builder.body(body).unwrap())
			.await
			.unwrap();
		let status = response.status();
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let json = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};
		(status, json)
	}

	async fn audit_count(&self, kind: AuditEventKind) -> i64 {
		AuditRepository::new(self.pool.clone())
			.count(Some(kind))
			.await
			.unwrap()
	}
}

// ============================================================================
// Health and configuration
// ============================================================================

#[tokio::test]
async fn health_reports_database_ok() {
	let app = default_app().await;
	let (status, body) = app.send("GET", "/health", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "ok");
	assert_eq!(body["audit"], "ok");
}

#[tokio::test]
async fn health_is_503_when_database_and_audit_sink_fail() {
	let app = default_app().await;
	app.pool.close().await;

	let (status, body) = app.send("GET", "/health", None).await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["database"], "error");
	assert_eq!(body["audit"], "error");
}

#[tokio::test]
async fn unconfigured_collaborators_answer_503() {
	let pool = create_test_pool().await;
	let router = create_router(AppState::new(pool, AuditService::disabled()));

	for (method, uri) in [
		("GET", "/api/users/"),
		("GET", "/api/groups/ops/subadmins"),
		("GET", "/api/chat/users/jdoe"),
	] {
		let response = router
			.clone()
			.oneshot(
				Request::builder()
					.method(method)
					.uri(uri)
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
	}
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn create_user_requires_all_fields() {
	let app = default_app().await;
	let (status, body) = app
		.send("POST", "/api/users/", Some(json!({"username": "jdoe"})))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["message"],
		"username, password, name, surname fields are required"
	);

	let (status, _) = app.send("POST", "/api/users/", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_user_reports_each_group() {
	let directory = InMemoryDirectory::new().with_group("ops");
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;
	let ops = InMemoryDirectory::group_dn("ops");
	let missing = InMemoryDirectory::group_dn("missing");

	let (status, body) = app
		.send(
			"POST",
			"/api/users/",
			Some(json!({
				"username": "jdoe",
				"password": "pw",
				"name": "Jane",
				"surname": "Doe",
				"groups": [ops, missing],
			})),
		)
		.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], true);
	assert_eq!(body["groups"][0]["added"], true);
	assert_eq!(body["groups"][1]["added"], false);
	assert!(body["groups"][1]["error"].is_string());
	assert_eq!(
		app.directory.members_of(&ops),
		vec![InMemoryDirectory::user_dn("jdoe")]
	);
	assert_eq!(app.audit_count(AuditEventKind::DirectoryUserCreated).await, 1);
}

#[tokio::test]
async fn duplicate_user_answers_200_with_reason() {
	let directory = InMemoryDirectory::new().with_user("jdoe");
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;

	let (status, body) = app
		.send(
			"POST",
			"/api/users/",
			Some(json!({"username": "jdoe", "password": "pw", "name": "Jane", "surname": "Doe"})),
		)
		.await;

	assert_eq!(status, StatusCode::OK);
	assert!(body["message"]
		.as_str()
		.unwrap()
		.starts_with("Failed to create user. "));
	assert_eq!(app.audit_count(AuditEventKind::DirectoryUserCreated).await, 1);
}

#[tokio::test]
async fn retrieve_user_maps_lookup_outcomes() {
	let directory = InMemoryDirectory::new()
		.with_user("jdoe")
		.with_user("twin")
		.with_user("twin")
		.with_group("ops");
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;
	let (status, _) = app
		.send(
			"POST",
			"/api/users/jdoe/groups/",
			Some(json!({"fqdn": InMemoryDirectory::group_dn("ops")})),
		)
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = app.send("GET", "/api/users/nobody", None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], "User does not exist");

	let (status, body) = app.send("GET", "/api/users/twin", None).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["message"], "More than 1 user found");

	let (status, body) = app.send("GET", "/api/users/jdoe", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["uid"], json!(["jdoe"]));
	assert_eq!(body["groups"][0]["cn"], json!(["ops"]));
}

#[tokio::test]
async fn membership_status_codes() {
	let directory = InMemoryDirectory::new().with_user("jdoe").with_group("ops");
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;
	let ops = InMemoryDirectory::group_dn("ops");

	let (status, body) = app
		.send("POST", "/api/users/jdoe/groups/", Some(json!({})))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "fqdn is required parameter");

	let (status, _) = app
		.send(
			"POST",
			"/api/users/jdoe/groups/",
			Some(json!({"fqdn": InMemoryDirectory::group_dn("nope")})),
		)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) = app
		.send("POST", "/api/users/jdoe/groups/", Some(json!({"fqdn": ops})))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["message"], "Success");

	let (status, body) = app
		.send("DELETE", "/api/users/jdoe/groups/", Some(json!({"fqdn": ops})))
		.await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["message"], "Success");

	let (status, body) = app
		.send("DELETE", "/api/users/jdoe/groups/", Some(json!({"fqdn": ops})))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["message"]
		.as_str()
		.unwrap()
		.starts_with("Failed to delete. "));

	let (status, _) = app.send("DELETE", "/api/users/jdoe/groups/", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_state_changes_go_to_groupware() {
	let groupware = InMemoryGroupware::new().with_user("jdoe");
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app.send("PATCH", "/api/users/jdoe/disable", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], true);
	assert_eq!(app.groupware.is_user_enabled("jdoe"), Some(false));

	let (status, body) = app.send("PATCH", "/api/users/jdoe/archive", None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body, json!({}));

	let (status, body) = app
		.send("PATCH", "/api/users/jdoe", Some(json!({"param": "email"})))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body, json!({}));

	let (status, body) = app
		.send(
			"PATCH",
			"/api/users/jdoe",
			Some(json!({"param": "email", "value": "j@example.org"})),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], true);

	let (status, body) = app.send("DELETE", "/api/users/ghost", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], false);
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn list_and_retrieve_groups() {
	let directory = InMemoryDirectory::new()
		.with_group("DivisionA")
		.with_group("DivisionB")
		.with_group("CountrySpain")
		.with_group("dup")
		.with_group("dup");
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;

	let (status, body) = app.send("GET", "/api/groups/?query=Division", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body.as_array().unwrap().len(), 2);

	let (status, body) = app.send("GET", "/api/groups/", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body.as_array().unwrap().len(), 5);

	let (status, body) = app.send("GET", "/api/groups/CountrySpain", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["cn"], json!(["CountrySpain"]));

	let (status, _) = app.send("GET", "/api/groups/missing", None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = app.send("GET", "/api/groups/dup", None).await;
	assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_and_delete_group_envelopes() {
	let app = default_app().await;

	let (status, body) = app.send("POST", "/api/groups/", Some(json!({}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "group_name is required");

	let (status, body) = app
		.send("POST", "/api/groups/", Some(json!({"group_name": "ops"})))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["status"], true);
	assert!(app.groupware.has_group("ops"));

	let (status, body) = app.send("DELETE", "/api/groups/ops", None).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["status"], true);
	assert!(!app.groupware.has_group("ops"));
}

#[tokio::test]
async fn bulk_delete_with_empty_keeps_groups_with_members() {
	let groupware = InMemoryGroupware::new()
		.with_group("empty1", &[])
		.with_group("busy", &["alice"])
		.with_group("empty2", &[]);
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app
		.send(
			"DELETE",
			"/api/groups/",
			Some(json!({"groups": ["empty1", "busy", "missing", "empty2"], "empty": true})),
		)
		.await;

	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["message"], "ok");
	assert_eq!(body["deleted"], json!(["empty1", "empty2"]));
	assert_eq!(body["skipped"], json!(["busy", "missing"]));
	assert!(app.groupware.has_group("busy"));
	assert!(!app.groupware.has_group("empty1"));
	assert!(!app.groupware.has_group("empty2"));
}

#[tokio::test]
async fn bulk_delete_without_empty_removes_all_and_requires_groups() {
	let groupware = InMemoryGroupware::new()
		.with_group("a", &[])
		.with_group("b", &["alice"]);
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, _) = app.send("DELETE", "/api/groups/", Some(json!({}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = app
		.send("DELETE", "/api/groups/", Some(json!({"groups": ["a", "b"]})))
		.await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["deleted"], json!(["a", "b"]));
}

#[tokio::test]
async fn bulk_delete_accepts_truthy_empty_flag() {
	for flag in [json!("true"), json!(1)] {
		let groupware = InMemoryGroupware::new()
			.with_group("quiet", &[])
			.with_group("busy", &["alice"]);
		let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

		let (status, body) = app
			.send(
				"DELETE",
				"/api/groups/",
				Some(json!({"groups": ["quiet", "busy"], "empty": flag})),
			)
			.await;
		assert_eq!(status, StatusCode::ACCEPTED, "{flag}");
		assert_eq!(body["deleted"], json!(["quiet"]), "{flag}");
		assert_eq!(body["skipped"], json!(["busy"]), "{flag}");
	}

	let groupware = InMemoryGroupware::new().with_group("busy", &["alice"]);
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;
	let (status, body) = app
		.send(
			"DELETE",
			"/api/groups/",
			Some(json!({"groups": ["busy"], "empty": 0})),
		)
		.await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["deleted"], json!(["busy"]));
}

#[tokio::test]
async fn subadmins_require_existing_group() {
	let groupware = InMemoryGroupware::new().with_group("ops", &["alice"]);
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app
		.send("POST", "/api/groups/ghost/subadmins", Some(json!({"username": "alice"})))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], "group not found");

	let (status, _) = app
		.send("POST", "/api/groups/ops/subadmins", Some(json!({})))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = app
		.send("POST", "/api/groups/ops/subadmins", Some(json!({"username": "alice"})))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["status"], true);

	let (status, body) = app.send("GET", "/api/groups/ops/subadmins", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"], json!(["alice"]));

	let (status, _) = app
		.send("DELETE", "/api/groups/ghost/subadmins/alice", None)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) = app
		.send("DELETE", "/api/groups/ops/subadmins/alice", None)
		.await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["status"], true);
}

// ============================================================================
// Groups with folders
// ============================================================================

#[tokio::test]
async fn group_with_folder_validation() {
	let app = default_app().await;

	let cases = [
		(json!({"group_name": "DivisionX"}), "group_name, group_type are required parameters"),
		(json!({"group_name": "X", "group_type": "teams"}), "Not allowed group type"),
		(
			json!({"group_name": "Foo", "group_type": "divisions"}),
			"Division group name must start with \"Division\"",
		),
		(
			json!({"group_name": "Foo", "group_type": "countries"}),
			"Country group name must start with \"Country\"",
		),
	];
	for (body, expected) in cases {
		let (status, response) = app
			.send("POST", "/api/groups-with-folders", Some(body))
			.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(response["message"], expected);
	}
	assert!(app.groupware.calls().is_empty());
}

#[tokio::test]
async fn group_with_folder_success() {
	let app = default_app().await;

	let (status, body) = app
		.send(
			"POST",
			"/api/groups-with-folders",
			Some(json!({"group_name": "DivisionX", "group_type": "divisions"})),
		)
		.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["message"], "Group with group folder successfully created");
	assert!(app.groupware.has_group("DivisionX"));
	assert_eq!(
		app.groupware.mount_points(),
		vec!["divisions", "divisions/DivisionX"]
	);
	assert_eq!(app.audit_count(AuditEventKind::GroupFolderProvisioned).await, 1);
}

#[tokio::test]
async fn group_with_folder_rejects_existing_group() {
	let groupware = InMemoryGroupware::new().with_group("CountrySpain", &[]);
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app
		.send(
			"POST",
			"/api/groups-with-folders",
			Some(json!({"group_name": "CountrySpain", "group_type": "countries"})),
		)
		.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Group with this name already exists");
	assert_eq!(app.audit_count(AuditEventKind::GroupFolderProvisioned).await, 0);
}

#[tokio::test]
async fn group_with_folder_group_creation_failure() {
	let groupware = InMemoryGroupware::new().fail_group_creation();
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app
		.send(
			"POST",
			"/api/groups-with-folders",
			Some(json!({"group_name": "Misc", "group_type": "other"})),
		)
		.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Something went wrong during group creation");
}

#[tokio::test]
async fn subfolder_failure_deletes_group() {
	let groupware = InMemoryGroupware::new()
		.with_folder("divisions")
		.fail_folder_creation("divisions/DivisionX");
	let app = setup(InMemoryDirectory::new(), groupware, ScriptedChat::new()).await;

	let (status, body) = app
		.send(
			"POST",
			"/api/groups-with-folders",
			Some(json!({"group_name": "DivisionX", "group_type": "divisions"})),
		)
		.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		body["message"],
		"Something went wrong during group folder creation"
	);
	assert_eq!(body["failed_step"], "create_group_folder");
	assert_eq!(
		body["rolled_back"],
		json!(["type_folder_access_granted", "group_created"])
	);
	assert!(!app.groupware.has_group("DivisionX"));
	assert_eq!(app.groupware.mount_points(), vec!["divisions"]);

	let records = AuditRepository::new(app.pool.clone())
		.list(Some(AuditEventKind::GroupFolderProvisioned), None)
		.await
		.unwrap();
	assert_eq!(records.len(), 1);
	assert!(!records[0].success);
}

// ============================================================================
// Org units
// ============================================================================

#[tokio::test]
async fn divisions_are_mapped_records() {
	let directory = InMemoryDirectory::new().with_org_unit(
		OrgUnit::Divisions,
		DirectoryEntry::new("cn=DivisionA,ou=Divisions,dc=example,dc=org")
			.with_attr("cn", "DivisionA")
			.with_attr("description", "Division A")
			.with_attr("objectClass", "organizationalUnit"),
	);
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;

	let (status, body) = app.send("GET", "/api/divisions", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!([{
			"machine_name": "DivisionA",
			"display_name": "Division A",
			"fqdn": "cn=DivisionA,ou=Divisions,dc=example,dc=org"
		}])
	);

	let (status, body) = app.send("GET", "/api/teams", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!([]));
}

#[tokio::test]
async fn multi_valued_org_unit_attribute_uses_first_value() {
	let directory = InMemoryDirectory::new().with_org_unit(
		OrgUnit::Franchises,
		DirectoryEntry::new("cn=F,ou=Franchises,dc=example,dc=org")
			.with_attr("cn", "F")
			.with_attr("cn", "G")
			.with_attr("description", "Europe")
			.with_attr("description", "EMEA"),
	);
	let app = setup(directory, InMemoryGroupware::new(), ScriptedChat::new()).await;

	let (status, body) = app.send("GET", "/api/franchises", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body[0]["machine_name"], "F");
	assert_eq!(body[0]["display_name"], "Europe");
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn chat_user_creation_error_is_recorded_once() {
	let app = setup(
		InMemoryDirectory::new(),
		InMemoryGroupware::new(),
		ScriptedChat::new().failing(),
	)
	.await;

	let (status, body) = app
		.send(
			"POST",
			"/api/chat/users",
			Some(json!({
				"username": "jdoe",
				"password": "hunter2",
				"email": "jdoe@example.org",
				"name": "Jane Doe"
			})),
		)
		.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["success"], false);

	let records = AuditRepository::new(app.pool.clone())
		.list(Some(AuditEventKind::CreateChatUser), None)
		.await
		.unwrap();
	assert_eq!(records.len(), 1);
	assert!(!records[0].success);
	assert!(!records[0].data.to_string().contains("hunter2"));
}

#[tokio::test]
async fn chat_channel_and_lookups() {
	let chat = ScriptedChat::new().with_user(json!({"_id": "u1", "username": "jdoe"}));
	let app = setup(InMemoryDirectory::new(), InMemoryGroupware::new(), chat).await;

	let (status, body) = app
		.send("POST", "/api/chat/channels", Some(json!({"channel_name": "general"})))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["success"], true);

	let (status, body) = app.send("GET", "/api/chat/channels/general", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["fname"], "general");

	let (status, _) = app.send("GET", "/api/chat/channels/random", None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) = app.send("GET", "/api/chat/users/jdoe", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["_id"], "u1");

	let (status, _) = app.send("DELETE", "/api/chat/users/u1", None).await;
	assert_eq!(status, StatusCode::OK);
	let (status, _) = app.send("DELETE", "/api/chat/users/u1", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	assert_eq!(app.audit_count(AuditEventKind::CreateChatChannel).await, 1);
}

// ============================================================================
// Audit log
// ============================================================================

#[tokio::test]
async fn actions_are_listed_newest_first_and_filtered() {
	let app = default_app().await;
	app.send("POST", "/api/chat/channels", Some(json!({"channel_name": "a"})))
		.await;
	app.send(
		"POST",
		"/api/chat/users",
		Some(json!({"username": "u", "password": "p", "email": "e@x", "name": "n"})),
	)
	.await;
	app.send("POST", "/api/chat/channels", Some(json!({"channel_name": "b"})))
		.await;

	let (status, body) = app.send("GET", "/api/actions", None).await;
	assert_eq!(status, StatusCode::OK);
	let events: Vec<&str> = body
		.as_array()
		.unwrap()
		.iter()
		.map(|r| r["event"].as_str().unwrap())
		.collect();
	assert_eq!(
		events,
		vec!["create_chat_channel", "create_chat_user", "create_chat_channel"]
	);

	let (status, body) = app
		.send("GET", "/api/actions?event=create_chat_channel&limit=1", None)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body.as_array().unwrap().len(), 1);
	assert_eq!(body[0]["data"]["channel_name"], "b");

	let (status, _) = app.send("GET", "/api/actions?event=bogus", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}
