// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! TEAP REST backend.
//!
//! Handlers are thin sequences of directory, groupware and chat calls. The
//! collaborators are built once at startup and injected through [`AppState`].

pub mod api;
pub mod error;
pub mod provisioning;
pub mod response;
pub mod routes;

pub use api::{create_app_state, create_router, AppState, StartupError};
pub use error::ApiError;
pub use teap_server_config::ServerConfig;
