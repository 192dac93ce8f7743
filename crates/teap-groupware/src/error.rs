// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupwareError {
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("Request timed out")]
	Timeout,

	#[error("Groupware rejected the service credentials")]
	Unauthorized,

	#[error("Invalid groupware URL: {0}")]
	InvalidUrl(String),

	#[error("Invalid response from groupware: {0}")]
	InvalidResponse(String),

	#[error("Groupware API error: {status} - {message}")]
	ApiError { status: u16, message: String },
}
