// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secrets from the environment, with `*_FILE` support for mounted secrets.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::secret::Secret;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load `var`, preferring the file named by `{var}_FILE` when it is set.
///
/// One trailing newline is stripped from file contents. Returns `Ok(None)` when
/// neither variable is set or the direct value is empty.
pub fn load_secret_env(var: &str) -> Result<Option<Secret<String>>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(Secret::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn reads_direct_value() {
		env::set_var("TEAP_TEST_SECRET_DIRECT", "s3cret");
		let secret = load_secret_env("TEAP_TEST_SECRET_DIRECT").unwrap().unwrap();
		assert_eq!(secret.expose(), "s3cret");
		env::remove_var("TEAP_TEST_SECRET_DIRECT");
	}

	#[test]
	fn file_takes_precedence_and_strips_newline() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var("TEAP_TEST_SECRET_BOTH", "from-env");
		env::set_var("TEAP_TEST_SECRET_BOTH_FILE", file.path());
		let secret = load_secret_env("TEAP_TEST_SECRET_BOTH").unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");
		env::remove_var("TEAP_TEST_SECRET_BOTH");
		env::remove_var("TEAP_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn empty_file_path_is_an_error() {
		env::set_var("TEAP_TEST_SECRET_EMPTY_FILE", "");
		let err = load_secret_env("TEAP_TEST_SECRET_EMPTY").unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { .. }));
		env::remove_var("TEAP_TEST_SECRET_EMPTY_FILE");
	}

	#[test]
	fn missing_is_none() {
		assert!(load_secret_env("TEAP_TEST_SECRET_MISSING").unwrap().is_none());
	}
}
