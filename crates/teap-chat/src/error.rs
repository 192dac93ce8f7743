// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("Request timed out")]
	Timeout,

	#[error("Chat login failed: {0}")]
	Login(String),

	#[error("Invalid chat URL: {0}")]
	InvalidUrl(String),

	#[error("Invalid response from chat: {0}")]
	InvalidResponse(String),
}
