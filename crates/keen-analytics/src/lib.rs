// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust client for the Keen event-analytics API.
//!
//! Records events into named collections and runs analyses (counts,
//! percentiles, grouped aggregations) over them.
//!
//! # Quick Start
//!
//! ```ignore
//! use keen_analytics::{Event, EventBatch, KeenClient, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keen_analytics::KeenError> {
//!     let client = KeenClient::new("master_key", "write_key", "project_id");
//!
//!     // One event
//!     client
//!         .add_event("purchases", &Event::new()
//!             .insert("item", "sword")
//!             .insert("price", 12.5)
//!             .timestamp(&chrono::Utc::now()))
//!         .await?;
//!
//!     // Several collections in one request
//!     let mut batch = EventBatch::new();
//!     batch.push("signups", &Event::new().insert("plan", "pro"))?;
//!     batch.push("pageviews", &Event::new().insert("page", "/pricing"))?;
//!     client.add_events(&batch).await?;
//!
//!     // Per-user results
//!     let result = client
//!         .get_analysis(&Query::new("average", "sentiment")
//!             .target_property("score")
//!             .group_by("userId"))
//!         .await?;
//!
//!     // Any other response shape
//!     let count = client
//!         .run_query(&Query::new("count", "purchases").timeframe("this_7_days"))
//!         .await?
//!         .as_scalar()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Event writes send the write key as the `Authorization` header. Queries
//! are GET requests and send the read key as the `api_key` query parameter.
//! Keen accepts both forms.
//!
//! # Errors
//!
//! Every operation makes exactly one request. Nothing is retried. A non-2xx
//! response becomes [`KeenError::Api`], whose message is the raw response
//! body.
//!
//! # Diagnostics
//!
//! The client logs through `tracing` at `debug` with the read key redacted
//! from URLs. For full request and response bodies install a
//! [`DiagnosticHook`], for example [`TracingDiagnostics`]:
//!
//! ```ignore
//! let client = KeenClient::builder()
//!     .project_id("project_id")
//!     .api_key("master_key")
//!     .write_key("write_key")
//!     .diagnostics(keen_analytics::TracingDiagnostics)
//!     .build()?;
//! ```

pub mod batch;
pub mod client;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod query;
pub mod result;

pub use batch::EventBatch;
pub use client::{ClientConfig, KeenClient, KeenClientBuilder, DEFAULT_BASE_URL};
pub use diagnostics::{DiagnosticEvent, DiagnosticHook, TracingDiagnostics};
pub use error::{KeenError, Result};
pub use event::{timestamp, Event, KeenProperties};
pub use query::{Filter, Query};
pub use result::{GroupedResult, QueryResponse, QueryResult, UserResult};

pub use keen_common_secret::SecretString;
