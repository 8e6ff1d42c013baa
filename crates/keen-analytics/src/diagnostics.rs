// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opt-in request/response diagnostics.
//!
//! A [`DiagnosticHook`] installed with
//! [`KeenClientBuilder::diagnostics`](crate::KeenClientBuilder::diagnostics)
//! sees every exchange the client makes. URLs handed to hooks already have
//! `api_key` replaced with `[REDACTED]`, and the `Authorization` header is
//! never passed on. Bodies are passed as-is; event payloads are the caller's
//! own data.

use std::time::Duration;

use reqwest::Method;
use tracing::trace;

/// One step of an HTTP exchange.
#[derive(Debug)]
pub enum DiagnosticEvent<'a> {
	RequestSent {
		method: &'a Method,
		url: &'a str,
		body: Option<&'a [u8]>,
	},
	ResponseReceived {
		method: &'a Method,
		url: &'a str,
		status: u16,
		body: &'a [u8],
		elapsed: Duration,
	},
	TransportFailed {
		method: &'a Method,
		url: &'a str,
		error: &'a reqwest::Error,
		elapsed: Duration,
	},
}

/// Receives [`DiagnosticEvent`]s. Called inline on the request path, so
/// implementations should not block.
pub trait DiagnosticHook: Send + Sync {
	fn on_event(&self, event: &DiagnosticEvent<'_>);
}

impl<F> DiagnosticHook for F
where
	F: Fn(&DiagnosticEvent<'_>) + Send + Sync,
{
	fn on_event(&self, event: &DiagnosticEvent<'_>) {
		self(event)
	}
}

/// Emits every exchange, bodies included, at `trace` level under the
/// `keen_analytics::wire` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticHook for TracingDiagnostics {
	fn on_event(&self, event: &DiagnosticEvent<'_>) {
		match event {
			DiagnosticEvent::RequestSent { method, url, body } => {
				let body = body.map(String::from_utf8_lossy).unwrap_or_default();
				trace!(
					target: "keen_analytics::wire",
					%method,
					url,
					body = %body,
					"request"
				);
			}
			DiagnosticEvent::ResponseReceived {
				method,
				url,
				status,
				body,
				elapsed,
			} => {
				trace!(
					target: "keen_analytics::wire",
					%method,
					url,
					status,
					elapsed_ms = elapsed.as_millis() as u64,
					body = %String::from_utf8_lossy(body),
					"response"
				);
			}
			DiagnosticEvent::TransportFailed {
				method,
				url,
				error,
				elapsed,
			} => {
				trace!(
					target: "keen_analytics::wire",
					%method,
					url,
					error = %error,
					elapsed_ms = elapsed.as_millis() as u64,
					"transport failure"
				);
			}
		}
	}
}
