// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Team chat (Rocket.Chat) integration.
//!
//! [`RocketChatClient`] talks to the REST API. [`ChatService`] wraps any
//! [`ChatClient`], turns failures into a [`ChatOutcome`] and writes one audit
//! event per create attempt.

pub mod client;
pub mod error;
pub mod response;
pub mod rocket;
pub mod service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::ChatClient;
pub use error::ChatError;
pub use response::ChatResponse;
pub use rocket::RocketChatClient;
pub use service::{ChatOutcome, ChatService};
