// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Multi-collection event batches.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{KeenError, Result};

/// Events grouped by collection name, sent in a single request.
///
/// Serializes as `{"<collection>": [event, ...], ...}`. Events keep the
/// order in which they were pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
	collections: BTreeMap<String, Vec<Value>>,
}

impl EventBatch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Encodes `event` and appends it to `collection`.
	///
	/// Encoding happens here, so a value that cannot be represented as JSON
	/// is rejected before anything is sent.
	pub fn push<E>(&mut self, collection: impl Into<String>, event: &E) -> Result<&mut Self>
	where
		E: Serialize + ?Sized,
	{
		let value = serde_json::to_value(event).map_err(KeenError::Encode)?;
		self
			.collections
			.entry(collection.into())
			.or_default()
			.push(value);
		Ok(self)
	}

	/// Appends already-encoded events to `collection`.
	pub fn extend<I>(&mut self, collection: impl Into<String>, events: I) -> &mut Self
	where
		I: IntoIterator<Item = Value>,
	{
		self
			.collections
			.entry(collection.into())
			.or_default()
			.extend(events);
		self
	}

	/// Events queued for `collection`, in push order.
	pub fn collection(&self, name: &str) -> Option<&[Value]> {
		self.collections.get(name).map(Vec::as_slice)
	}

	pub fn collection_names(&self) -> impl Iterator<Item = &str> {
		self.collections.keys().map(String::as_str)
	}

	/// Total number of events across every collection.
	pub fn len(&self) -> usize {
		self.collections.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Serialize for EventBatch {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.collections.serialize(serializer)
	}
}

impl From<BTreeMap<String, Vec<Value>>> for EventBatch {
	fn from(collections: BTreeMap<String, Vec<Value>>) -> Self {
		Self { collections }
	}
}

impl From<HashMap<String, Vec<Value>>> for EventBatch {
	fn from(collections: HashMap<String, Vec<Value>>) -> Self {
		Self {
			collections: collections.into_iter().collect(),
		}
	}
}
