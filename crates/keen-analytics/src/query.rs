// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analysis query descriptions and their request path.

use serde::{Deserialize, Serialize};

/// Optional filtering for an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
	/// Percentile to compute, for `percentile` analyses (e.g. `"90"`).
	pub percentile: String,
	/// Relative or absolute timeframe (e.g. `"this_7_days"`).
	pub timeframe: String,
}

/// One analytical request against an event collection.
///
/// Every field is forwarded to Keen verbatim. Nothing is validated locally;
/// Keen rejects what it does not understand.
///
/// ```
/// use keen_analytics::Query;
///
/// let query = Query::new("count", "clicks")
///     .target_property("value")
///     .group_by("page");
/// assert_eq!(query.path(), "/queries/count");
/// assert_eq!(
///     query.params(),
///     [("event_collection", "clicks"), ("target_property", "value"), ("group_by", "page")]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
	/// Analysis type: `count`, `sum`, `average`, `percentile`, ...
	pub analysis_type: String,
	pub event_collection: String,
	pub target_property: String,
	pub group_by: String,
	pub filter: Filter,
}

impl Query {
	pub fn new(analysis_type: impl Into<String>, event_collection: impl Into<String>) -> Self {
		Self {
			analysis_type: analysis_type.into(),
			event_collection: event_collection.into(),
			..Self::default()
		}
	}

	pub fn target_property(mut self, property: impl Into<String>) -> Self {
		self.target_property = property.into();
		self
	}

	pub fn group_by(mut self, property: impl Into<String>) -> Self {
		self.group_by = property.into();
		self
	}

	pub fn percentile(mut self, percentile: impl Into<String>) -> Self {
		self.filter.percentile = percentile.into();
		self
	}

	pub fn timeframe(mut self, timeframe: impl Into<String>) -> Self {
		self.filter.timeframe = timeframe.into();
		self
	}

	/// Path relative to the project URL, e.g. `/queries/count`.
	pub fn path(&self) -> String {
		format!("/queries/{}", urlencoding::encode(&self.analysis_type))
	}

	/// Query-string pairs in send order, unencoded.
	///
	/// `event_collection` is always present. `target_property`, `group_by`,
	/// `percentile` and `timeframe` follow in that order, each only when
	/// non-empty. The read key is not included.
	pub fn params(&self) -> Vec<(&'static str, &str)> {
		let optional = [
			("target_property", &self.target_property),
			("group_by", &self.group_by),
			("percentile", &self.filter.percentile),
			("timeframe", &self.filter.timeframe),
		];

		let mut params = vec![("event_collection", self.event_collection.as_str())];
		params.extend(
			optional
				.into_iter()
				.filter(|(_, value)| !value.is_empty())
				.map(|(name, value)| (name, value.as_str())),
		);
		params
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn params_with_target_and_group() {
		let query = Query {
			analysis_type: "count".to_string(),
			event_collection: "clicks".to_string(),
			target_property: "value".to_string(),
			group_by: "page".to_string(),
			filter: Filter::default(),
		};
		assert_eq!(query.path(), "/queries/count");
		assert_eq!(
			query.params(),
			[
				("event_collection", "clicks"),
				("target_property", "value"),
				("group_by", "page"),
			]
		);
	}

	#[test]
	fn params_omit_empty_fields() {
		let query = Query::new("count", "signups");
		assert_eq!(query.params(), [("event_collection", "signups")]);
	}

	#[test]
	fn filter_follows_grouping() {
		let query = Query::new("percentile", "purchases")
			.target_property("price")
			.percentile("90")
			.timeframe("this_7_days");
		assert_eq!(
			query.params(),
			[
				("event_collection", "purchases"),
				("target_property", "price"),
				("percentile", "90"),
				("timeframe", "this_7_days"),
			]
		);
	}

	#[test]
	fn analysis_type_is_one_path_segment() {
		assert_eq!(Query::new("funnel/x", "c").path(), "/queries/funnel%2Fx");
	}
}
