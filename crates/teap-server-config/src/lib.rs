// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the TEAP server.
//!
//! Values are merged from built-in defaults, a TOML file and `TEAP_SERVER_*`
//! environment variables, in that order. Passwords for the directory,
//! groupware and chat service accounts are only read from the environment
//! (`*_PASSWORD` or `*_PASSWORD_FILE`).
//!
//! ```ignore
//! use teap_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use teap_common_config::{load_secret_env, SecretString};
use tracing::{debug, info};

/// Fully resolved server configuration.
///
/// The collaborator sections are `None` when their settings are incomplete;
/// routes backed by a missing collaborator answer 503.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub audit: AuditConfig,
	pub directory: Option<DirectoryConfig>,
	pub groupware: Option<GroupwareConfig>,
	pub chat: Option<ChatConfig>,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration with the standard precedence.
///
/// 1. Environment variables (`TEAP_SERVER_*`)
/// 2. Config file (`/etc/teap/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn secret(var: &str) -> Result<Option<SecretString>, ConfigError> {
	load_secret_env(var).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let directory_password = secret("TEAP_SERVER_DIRECTORY_PASSWORD")?;
	let groupware_password = secret("TEAP_SERVER_GROUPWARE_PASSWORD")?;
	let chat_password = secret("TEAP_SERVER_CHAT_PASSWORD")?;

	finalize_with_secrets(layer, directory_password, groupware_password, chat_password)
}

fn finalize_with_secrets(
	layer: ServerConfigLayer,
	directory_password: Option<SecretString>,
	groupware_password: Option<SecretString>,
	chat_password: Option<SecretString>,
) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let audit = layer.audit.unwrap_or_default().finalize();

	let directory = layer
		.directory
		.and_then(|l| l.finalize(directory_password));
	let groupware = layer
		.groupware
		.and_then(|l| l.finalize(groupware_password));
	let chat = layer.chat.and_then(|l| l.finalize(chat_password));

	validate_config(&http, directory.as_ref())?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		audit_enabled = audit.enabled,
		directory_configured = directory.is_some(),
		groupware_configured = groupware.is_some(),
		chat_configured = chat.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		logging,
		audit,
		directory,
		groupware,
		chat,
	})
}

fn validate_config(
	http: &HttpConfig,
	directory: Option<&DirectoryConfig>,
) -> Result<(), ConfigError> {
	if http.port == 0 {
		return Err(ConfigError::Validation(
			"TEAP_SERVER_PORT must be non-zero".to_string(),
		));
	}

	if let Some(directory) = directory {
		if !directory.url.starts_with("ldap://") && !directory.url.starts_with("ldaps://") {
			return Err(ConfigError::Validation(format!(
				"directory url '{}' must use the ldap:// or ldaps:// scheme",
				directory.url
			)));
		}
	}

	Ok(())
}
