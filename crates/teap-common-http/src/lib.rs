// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for the groupware and chat clients.
//!
//! Requests are never retried here; callers see the first failure.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent, DEFAULT_TIMEOUT};
