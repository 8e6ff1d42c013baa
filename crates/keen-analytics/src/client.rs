// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keen client for recording events and running analyses.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use keen_common_config::{load_env, load_secret_env};
use keen_common_secret::{redact_url, SecretString};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, Request, Url};
use serde::Serialize;
use tracing::{debug, info};

use crate::batch::EventBatch;
use crate::diagnostics::{DiagnosticEvent, DiagnosticHook};
use crate::error::{KeenError, Result};
use crate::query::Query;
use crate::result::{QueryResponse, QueryResult};

/// Projects root of the hosted Keen API.
pub const DEFAULT_BASE_URL: &str = "https://api.keen.io/3.0/projects";

/// Environment variables read by [`KeenClient::from_env`].
pub const ENV_PROJECT_ID: &str = "KEEN_PROJECT_ID";
pub const ENV_MASTER_KEY: &str = "KEEN_MASTER_KEY";
pub const ENV_READ_KEY: &str = "KEEN_READ_KEY";
pub const ENV_WRITE_KEY: &str = "KEEN_WRITE_KEY";
pub const ENV_BASE_URL: &str = "KEEN_BASE_URL";

/// Transport settings for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Projects root; the project id is appended to it.
	pub base_url: String,
	/// Per-request timeout. `None` leaves requests unbounded.
	pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			request_timeout: None,
		}
	}
}

/// Builder for constructing a [`KeenClient`].
#[derive(Default)]
pub struct KeenClientBuilder {
	api_key: Option<SecretString>,
	write_key: Option<SecretString>,
	project_id: Option<String>,
	config: ClientConfig,
	http_client: Option<Client>,
	diagnostics: Option<Arc<dyn DiagnosticHook>>,
}

impl KeenClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the master or read key, used for analyses.
	pub fn api_key(mut self, key: impl Into<SecretString>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the write key, used for recording events.
	pub fn write_key(mut self, key: impl Into<SecretString>) -> Self {
		self.write_key = Some(key.into());
		self
	}

	pub fn project_id(mut self, id: impl Into<String>) -> Self {
		self.project_id = Some(id.into());
		self
	}

	/// Overrides the projects root, e.g. for a proxy or a test server.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.config.base_url = url.into();
		self
	}

	/// Sets the HTTP request timeout. Ignored when a transport is supplied
	/// with [`http_client`](Self::http_client).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = Some(timeout);
		self
	}

	/// Replaces base URL and timeout in one go.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	/// Uses the given `reqwest::Client` instead of building one.
	pub fn http_client(mut self, client: Client) -> Self {
		self.http_client = Some(client);
		self
	}

	/// Installs a hook that observes every request and response.
	pub fn diagnostics(mut self, hook: impl DiagnosticHook + 'static) -> Self {
		self.diagnostics = Some(Arc::new(hook));
		self
	}

	/// Builds the client. No network activity happens here and the keys are
	/// not checked; missing keys are sent as empty strings.
	pub fn build(self) -> Result<KeenClient> {
		let project_id = self.project_id.ok_or(KeenError::MissingProjectId)?;
		let base_url = normalize_base_url(&self.config.base_url)?;

		let http_client = match self.http_client {
			Some(client) => client,
			None => {
				let mut builder = keen_common_http::builder();
				if let Some(timeout) = self.config.request_timeout {
					builder = builder.timeout(timeout);
				}
				builder.build().map_err(KeenError::RequestFailed)?
			}
		};

		Ok(KeenClient::from_parts(ClientInner {
			api_key: self.api_key.unwrap_or_else(|| SecretString::from("")),
			write_key: self.write_key.unwrap_or_else(|| SecretString::from("")),
			project_id,
			base_url,
			http_client,
			diagnostics: self.diagnostics,
		}))
	}
}

fn normalize_base_url(raw: &str) -> Result<String> {
	let trimmed = raw.trim_end_matches('/');
	let parsed = Url::parse(trimmed).map_err(|_| KeenError::InvalidBaseUrl(raw.to_string()))?;
	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(KeenError::InvalidBaseUrl(raw.to_string()));
	}
	Ok(trimmed.to_string())
}

struct ClientInner {
	api_key: SecretString,
	write_key: SecretString,
	project_id: String,
	base_url: String,
	http_client: Client,
	diagnostics: Option<Arc<dyn DiagnosticHook>>,
}

/// Client for a single Keen project.
///
/// Holds no per-call state: clones share one connection pool and may be used
/// from many tasks at once. Each operation makes exactly one HTTP request
/// and nothing is retried.
///
/// # Example
///
/// ```ignore
/// use keen_analytics::{Event, KeenClient, Query};
///
/// let client = KeenClient::new("master_key", "write_key", "project_id");
///
/// client
///     .add_event("purchases", &Event::new().insert("item", "sword"))
///     .await?;
///
/// let result = client
///     .get_analysis(&Query::new("count", "purchases").group_by("item"))
///     .await?;
/// ```
#[derive(Clone)]
pub struct KeenClient {
	inner: Arc<ClientInner>,
}

impl KeenClient {
	/// Creates a client on the default transport and Keen base URL.
	pub fn new(
		api_key: impl Into<SecretString>,
		write_key: impl Into<SecretString>,
		project_id: impl Into<String>,
	) -> Self {
		Self::from_parts(ClientInner {
			api_key: api_key.into(),
			write_key: write_key.into(),
			project_id: project_id.into(),
			base_url: DEFAULT_BASE_URL.to_string(),
			http_client: keen_common_http::new_client(),
			diagnostics: None,
		})
	}

	pub fn builder() -> KeenClientBuilder {
		KeenClientBuilder::new()
	}

	/// Creates a client from `KEEN_PROJECT_ID`, `KEEN_MASTER_KEY` (or
	/// `KEEN_READ_KEY`), `KEEN_WRITE_KEY` and optionally `KEEN_BASE_URL`.
	///
	/// Keys also accept the `*_FILE` form. Only the project id is required.
	pub fn from_env() -> Result<Self> {
		let project_id = load_env(ENV_PROJECT_ID).ok_or_else(|| KeenError::MissingEnv {
			var: ENV_PROJECT_ID.to_string(),
		})?;

		let mut builder = KeenClientBuilder::new().project_id(project_id);

		let read_key = match load_secret_env(ENV_MASTER_KEY)? {
			Some(key) => Some(key),
			None => load_secret_env(ENV_READ_KEY)?,
		};
		if let Some(key) = read_key {
			builder = builder.api_key(key);
		}
		if let Some(key) = load_secret_env(ENV_WRITE_KEY)? {
			builder = builder.write_key(key);
		}
		if let Some(url) = load_env(ENV_BASE_URL) {
			builder = builder.base_url(url);
		}

		builder.build()
	}

	fn from_parts(inner: ClientInner) -> Self {
		info!(
			base_url = %inner.base_url,
			project_id = %inner.project_id,
			diagnostics = inner.diagnostics.is_some(),
			"Keen client initialized"
		);
		Self {
			inner: Arc::new(inner),
		}
	}

	pub fn project_id(&self) -> &str {
		&self.inner.project_id
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	/// Records one event in `collection`.
	///
	/// # Example
	///
	/// ```ignore
	/// client
	///     .add_event("purchases", &Event::new().insert("price", 9.99).timestamp(&Utc::now()))
	///     .await?;
	/// ```
	pub async fn add_event<E>(&self, collection: &str, event: &E) -> Result<()>
	where
		E: Serialize + ?Sized,
	{
		let body = serde_json::to_vec(event).map_err(KeenError::Encode)?;
		let path = format!("/events/{}", urlencoding::encode(collection));

		let request = self.build_request(Method::POST, &path, &[], Some(body))?;
		self.execute(request).await?;

		debug!(collection = %collection, "Event recorded");
		Ok(())
	}

	/// Records every event of `batch` in one request.
	///
	/// Keen may report per-event outcomes in a 2xx body; those are not
	/// inspected.
	pub async fn add_events(&self, batch: &EventBatch) -> Result<()> {
		let body = serde_json::to_vec(batch).map_err(KeenError::Encode)?;

		let request = self.build_request(Method::POST, "/events", &[], Some(body))?;
		self.execute(request).await?;

		debug!(count = batch.len(), "Event batch recorded");
		Ok(())
	}

	/// Runs `query` and decodes the per-user result shape
	/// `{"result": [{"result": n, "userId": ".."}]}`.
	///
	/// Analyses that answer with another shape fail with
	/// [`KeenError::Decode`]; use [`run_query`](Self::run_query) for those.
	pub async fn get_analysis(&self, query: &Query) -> Result<QueryResult> {
		self.run_query(query).await?.as_user_results()
	}

	/// Runs `query` and returns the response as untyped JSON.
	pub async fn run_query(&self, query: &Query) -> Result<QueryResponse> {
		let request = self.build_request(Method::GET, &query.path(), &query.params(), None)?;
		let body = self.execute(request).await?;
		QueryResponse::from_slice(&body)
	}

	/// Builds the single request for an operation. `params` are appended to
	/// the query string in order.
	///
	/// - With a body: JSON content type and length, `Authorization` is the
	///   write key.
	/// - GET without a body: the read key goes in a trailing `api_key` query
	///   parameter and no `Authorization` header is set.
	/// - Any other method without a body: `Authorization` is the read key.
	pub(crate) fn build_request(
		&self,
		method: Method,
		path: &str,
		params: &[(&str, &str)],
		body: Option<Vec<u8>>,
	) -> Result<Request> {
		let inner = &self.inner;
		let mut url = Url::parse(&format!(
			"{}/{}{}",
			inner.base_url,
			urlencoding::encode(&inner.project_id),
			path
		))
		.map_err(|_| KeenError::InvalidBaseUrl(inner.base_url.clone()))?;

		let read_key_in_query = body.is_none() && method == Method::GET;
		if !params.is_empty() || read_key_in_query {
			let mut pairs = url.query_pairs_mut();
			pairs.extend_pairs(params);
			if read_key_in_query {
				pairs.append_pair("api_key", inner.api_key.expose());
			}
		}

		let builder = match body {
			Some(body) => inner
				.http_client
				.request(method, url)
				.header(AUTHORIZATION, inner.write_key.expose().as_str())
				.header(CONTENT_TYPE, "application/json")
				.header(CONTENT_LENGTH, body.len().to_string())
				.body(body),
			None if read_key_in_query => inner.http_client.request(method, url),
			None => inner
				.http_client
				.request(method, url)
				.header(AUTHORIZATION, inner.api_key.expose().as_str()),
		};

		builder.build().map_err(transport_error)
	}

	/// Sends `request` and returns the body of a 2xx response.
	pub(crate) async fn execute(&self, request: Request) -> Result<Vec<u8>> {
		let method = request.method().clone();
		let mut shown = request.url().clone();
		redact_url(&mut shown, "api_key");
		let url = shown.to_string();
		let hook = self.inner.diagnostics.as_deref();

		if let Some(hook) = hook {
			hook.on_event(&DiagnosticEvent::RequestSent {
				method: &method,
				url: &url,
				body: request.body().and_then(|b| b.as_bytes()),
			});
		}

		debug!(method = %method, url = %url, "Sending Keen request");
		let started = Instant::now();

		let failed = |e: reqwest::Error| {
			let e = scrub_url(e);
			let elapsed = started.elapsed();
			debug!(method = %method, url = %url, error = %e, "Keen request failed");
			if let Some(hook) = hook {
				hook.on_event(&DiagnosticEvent::TransportFailed {
					method: &method,
					url: &url,
					error: &e,
					elapsed,
				});
			}
			KeenError::RequestFailed(e)
		};

		let response = self
			.inner
			.http_client
			.execute(request)
			.await
			.map_err(&failed)?;
		let status = response.status();
		let body = response.bytes().await.map_err(&failed)?;
		let elapsed = started.elapsed();

		debug!(
			method = %method,
			url = %url,
			status = status.as_u16(),
			elapsed_ms = elapsed.as_millis() as u64,
			"Keen response received"
		);

		if let Some(hook) = hook {
			hook.on_event(&DiagnosticEvent::ResponseReceived {
				method: &method,
				url: &url,
				status: status.as_u16(),
				body: &body,
				elapsed,
			});
		}

		if !status.is_success() {
			return Err(KeenError::Api {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(body.to_vec())
	}
}

/// reqwest errors carry the request URL, which for queries holds the read
/// key.
fn scrub_url(mut e: reqwest::Error) -> reqwest::Error {
	if let Some(url) = e.url_mut() {
		redact_url(url, "api_key");
	}
	e
}

fn transport_error(e: reqwest::Error) -> KeenError {
	KeenError::RequestFailed(scrub_url(e))
}

impl fmt::Debug for KeenClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeenClient")
			.field("project_id", &self.inner.project_id)
			.field("base_url", &self.inner.base_url)
			.field("api_key", &self.inner.api_key)
			.field("write_key", &self.inner.write_key)
			.field("diagnostics", &self.inner.diagnostics.is_some())
			.finish()
	}
}
