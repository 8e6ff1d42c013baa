// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP transport for the Keen client.
//!
//! Every client built here carries the same User-Agent so that requests can
//! be attributed to this SDK on the Keen side. Connection pooling is
//! whatever `reqwest` does by default; nothing here retries.

mod client;

pub use client::{builder, new_client, user_agent};
