// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Keen client.

use keen_common_config::SecretEnvError;
use thiserror::Error;

/// Keen client errors.
///
/// Every variant is returned straight to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum KeenError {
	/// The request payload could not be serialized. No request was sent.
	#[error("failed to encode request body: {0}")]
	Encode(#[source] serde_json::Error),

	/// Network-level failure reported by the transport.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Keen answered with a status outside 200-299. The message is the raw
	/// response body.
	#[error("{body}")]
	Api { status: u16, body: String },

	/// The response body is not JSON or does not have the expected shape.
	#[error("failed to decode response body: {0}")]
	Decode(#[source] serde_json::Error),

	/// A typed projection of a query response did not match its JSON.
	#[error("unexpected query response shape: {0}")]
	UnexpectedShape(String),

	/// No project id was given to the builder.
	#[error("project id is required")]
	MissingProjectId,

	/// The configured base URL is not an absolute http(s) URL.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// A required environment variable is unset.
	#[error("missing configuration: set either {var} or {var}_FILE")]
	MissingEnv { var: String },

	/// A credential file referenced from the environment could not be read.
	#[error(transparent)]
	Env(#[from] SecretEnvError),
}

impl KeenError {
	/// HTTP status of an [`KeenError::Api`] error.
	pub fn status(&self) -> Option<u16> {
		match self {
			KeenError::Api { status, .. } => Some(*status),
			KeenError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
			_ => None,
		}
	}
}

/// Result type alias for Keen client operations.
pub type Result<T> = std::result::Result<T, KeenError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_error_message_is_raw_body() {
		let err = KeenError::Api {
			status: 403,
			body: "forbidden".to_string(),
		};
		assert_eq!(err.to_string(), "forbidden");
		assert_eq!(err.status(), Some(403));
	}

	#[test]
	fn api_error_keeps_json_body_verbatim() {
		let body = r#"{"message":"bad key","error_code":"InvalidApiKeyError"}"#;
		let err = KeenError::Api {
			status: 401,
			body: body.to_string(),
		};
		assert_eq!(err.to_string(), body);
	}

	#[test]
	fn decode_error_mentions_decoding() {
		let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
		let err = KeenError::Decode(source);
		assert!(err.to_string().starts_with("failed to decode response body"));
		assert_eq!(err.status(), None);
	}

	#[test]
	fn missing_env_names_file_variant() {
		let err = KeenError::MissingEnv {
			var: "KEEN_WRITE_KEY".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"missing configuration: set either KEEN_WRITE_KEY or KEEN_WRITE_KEY_FILE"
		);
	}
}
