// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
	#[error("{0} does not exist")]
	NotFound(String),

	#[error("more than one entry matches {0}")]
	MultipleFound(String),

	/// The server refused the change (entry exists, no such object, value
	/// already present...). Carries the server's diagnostic text.
	#[error("{0}")]
	ConstraintViolation(String),

	#[error("directory connection failed: {0}")]
	Connection(String),

	#[error("directory error: {0}")]
	Upstream(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
	#[error("records cannot be converted back to directory attributes")]
	DumpUnsupported,
}
