// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuditConfigLayer, ChatConfigLayer, DatabaseConfigLayer, DirectoryConfigLayer,
	GroupwareConfigLayer, HttpConfigLayer, LoggingConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/teap/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TEAP_SERVER_<SECTION>_<FIELD>. Passwords are not read here;
/// they go through `load_secret_env` at finalize time.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()),
			logging: Some(load_logging_from_env()),
			audit: Some(load_audit_from_env()),
			directory: Some(load_directory_from_env()?),
			groupware: Some(load_groupware_from_env()?),
			chat: Some(load_chat_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("TEAP_SERVER_HOST"),
		port: env_u16("TEAP_SERVER_PORT")?,
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("TEAP_SERVER_DATABASE_URL"),
	}
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("TEAP_SERVER_LOG_LEVEL"),
		json: env_bool("TEAP_SERVER_LOG_JSON"),
	}
}

fn load_audit_from_env() -> AuditConfigLayer {
	AuditConfigLayer {
		enabled: env_bool("TEAP_SERVER_AUDIT_ENABLED"),
	}
}

fn load_directory_from_env() -> Result<DirectoryConfigLayer, ConfigError> {
	Ok(DirectoryConfigLayer {
		url: env_var("TEAP_SERVER_DIRECTORY_URL"),
		bind_dn: env_var("TEAP_SERVER_DIRECTORY_BIND_DN"),
		base_dn: env_var("TEAP_SERVER_DIRECTORY_BASE_DN"),
		users_ou: env_var("TEAP_SERVER_DIRECTORY_USERS_OU"),
		groups_ou: env_var("TEAP_SERVER_DIRECTORY_GROUPS_OU"),
		divisions_ou: env_var("TEAP_SERVER_DIRECTORY_DIVISIONS_OU"),
		franchises_ou: env_var("TEAP_SERVER_DIRECTORY_FRANCHISES_OU"),
		teams_ou: env_var("TEAP_SERVER_DIRECTORY_TEAMS_OU"),
		member_attribute: env_var("TEAP_SERVER_DIRECTORY_MEMBER_ATTRIBUTE"),
		connect_timeout_secs: env_u64("TEAP_SERVER_DIRECTORY_CONNECT_TIMEOUT_SECS")?,
	})
}

fn load_groupware_from_env() -> Result<GroupwareConfigLayer, ConfigError> {
	Ok(GroupwareConfigLayer {
		url: env_var("TEAP_SERVER_GROUPWARE_URL"),
		user: env_var("TEAP_SERVER_GROUPWARE_USER"),
		timeout_secs: env_u64("TEAP_SERVER_GROUPWARE_TIMEOUT_SECS")?,
	})
}

fn load_chat_from_env() -> Result<ChatConfigLayer, ConfigError> {
	Ok(ChatConfigLayer {
		url: env_var("TEAP_SERVER_CHAT_URL"),
		user: env_var("TEAP_SERVER_CHAT_USER"),
		timeout_secs: env_u64("TEAP_SERVER_CHAT_TIMEOUT_SECS")?,
	})
}
