// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Serialize;
use serde_json::Value;

/// HTTP status and decoded JSON body of one chat call. Bodies that are not
/// JSON decode to `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
	pub status: u16,
	pub body: Value,
}

impl ChatResponse {
	pub fn new(status: u16, body: Value) -> Self {
		Self { status, body }
	}

	/// Chat calls only count as successful on exactly 200.
	pub fn is_success(&self) -> bool {
		self.status == 200
	}

	/// First element of the list under `key`, e.g. `channels` or `users`.
	pub fn first_of(&self, key: &str) -> Option<Value> {
		self.body.get(key)?.as_array()?.first().cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn only_200_is_success() {
		assert!(ChatResponse::new(200, Value::Null).is_success());
		assert!(!ChatResponse::new(201, Value::Null).is_success());
		assert!(!ChatResponse::new(400, Value::Null).is_success());
	}

	#[test]
	fn first_of_reads_list() {
		let response = ChatResponse::new(
			200,
			json!({"channels": [{"fname": "general"}, {"fname": "random"}]}),
		);
		assert_eq!(response.first_of("channels"), Some(json!({"fname": "general"})));
		assert_eq!(response.first_of("users"), None);

		let empty = ChatResponse::new(200, json!({"channels": []}));
		assert_eq!(empty.first_of("channels"), None);
	}
}
