// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query responses.
//!
//! Keen's response shape depends on the analysis: a bare number for an
//! ungrouped `count`, an array of objects for a grouped one, and so on.
//! [`QueryResponse`] keeps the untyped JSON and offers a projection per known
//! shape. [`QueryResult`] is the fixed per-user shape returned by
//! [`KeenClient::get_analysis`](crate::KeenClient::get_analysis).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KeenError, Result};

/// One entry of a per-user result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
	pub result: f64,
	#[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
}

/// `{"result": [{"result": <number>, "userId": <string>}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
	pub result: Vec<UserResult>,
}

impl QueryResult {
	/// Orders entries by ascending value.
	pub fn sort_by_result(&mut self) {
		self
			.result
			.sort_by(|a, b| a.result.partial_cmp(&b.result).unwrap_or(Ordering::Equal));
	}

	pub fn len(&self) -> usize {
		self.result.len()
	}

	pub fn is_empty(&self) -> bool {
		self.result.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &UserResult> {
		self.result.iter()
	}
}

/// One group of a grouped analysis, e.g. `{"page": "/home", "result": 12}`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult {
	/// Value of the group-by property. `Null` for events missing it.
	pub group: Value,
	pub result: f64,
}

/// Untyped body of a query response.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
	raw: Value,
}

impl QueryResponse {
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		let raw = serde_json::from_slice(body).map_err(KeenError::Decode)?;
		Ok(Self { raw })
	}

	pub fn raw(&self) -> &Value {
		&self.raw
	}

	pub fn into_raw(self) -> Value {
		self.raw
	}

	/// The top-level `result` member.
	pub fn result(&self) -> Option<&Value> {
		self.raw.get("result")
	}

	/// `{"result": <number>}`, returned by ungrouped analyses.
	pub fn as_scalar(&self) -> Result<f64> {
		self
			.result()
			.and_then(Value::as_f64)
			.ok_or_else(|| KeenError::UnexpectedShape("expected a numeric `result`".to_string()))
	}

	/// `{"result": [{"<group_by>": .., "result": <number>}, ...]}`
	pub fn as_grouped(&self, group_by: &str) -> Result<Vec<GroupedResult>> {
		let entries = self.result().and_then(Value::as_array).ok_or_else(|| {
			KeenError::UnexpectedShape("expected an array `result`".to_string())
		})?;

		entries
			.iter()
			.map(|entry| {
				let result = entry.get("result").and_then(Value::as_f64).ok_or_else(|| {
					KeenError::UnexpectedShape(
						"grouped entry is missing a numeric `result`".to_string(),
					)
				})?;
				let group = entry.get(group_by).cloned().unwrap_or(Value::Null);
				Ok(GroupedResult { group, result })
			})
			.collect()
	}

	/// The fixed per-user shape. A mismatch is a [`KeenError::Decode`].
	pub fn as_user_results(&self) -> Result<QueryResult> {
		QueryResult::deserialize(&self.raw).map_err(KeenError::Decode)
	}
}
