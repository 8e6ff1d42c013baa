// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event values and the Keen timestamp format.
//!
//! Any `Serialize` value can be sent as an event. [`Event`] is a small JSON
//! object builder for the common case where the caller has no struct of its
//! own.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Format Keen expects for `keen.timestamp`: UTC, millisecond precision,
/// trailing `Z`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a point in time as `YYYY-MM-DDTHH:MM:SS.sssZ` in UTC.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
///
/// let est = FixedOffset::west_opt(5 * 3600).unwrap();
/// let t = est.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
/// assert_eq!(keen_analytics::timestamp(&t), "2021-03-04T15:00:00.000Z");
/// ```
pub fn timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
	t.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string()
}

/// The reserved `keen` object of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeenProperties {
	pub timestamp: String,
}

impl KeenProperties {
	pub fn at<Tz: TimeZone>(t: &DateTime<Tz>) -> Self {
		Self {
			timestamp: timestamp(t),
		}
	}

	pub fn now() -> Self {
		Self::at(&Utc::now())
	}
}

/// A builder for an ad-hoc event.
///
/// ```
/// use keen_analytics::Event;
///
/// let event = Event::new()
///     .insert("item", "sword")
///     .insert("price", 12.5)
///     .insert("premium", true);
/// assert_eq!(event.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
	inner: Map<String, Value>,
}

impl Event {
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a property. Any later insert of the same key wins.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Sets `keen.timestamp`, keeping any other keys already under `keen`.
	pub fn timestamp<Tz: TimeZone>(mut self, t: &DateTime<Tz>) -> Self {
		let formatted = Value::String(timestamp(t));
		match self.inner.get_mut("keen") {
			Some(Value::Object(keen)) => {
				keen.insert("timestamp".to_string(), formatted);
			}
			_ => {
				let mut keen = Map::new();
				keen.insert("timestamp".to_string(), formatted);
				self.inner.insert("keen".to_string(), Value::Object(keen));
			}
		}
		self
	}

	/// Merges another event into this one. Keys from `other` win.
	pub fn merge(mut self, other: Event) -> Self {
		for (k, v) in other.inner {
			self.inner.insert(k, v);
		}
		self
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}
}

impl From<Event> for Value {
	fn from(event: Event) -> Self {
		event.into_value()
	}
}

impl From<Map<String, Value>> for Event {
	fn from(map: Map<String, Value>) -> Self {
		Self { inner: map }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{FixedOffset, NaiveDate};
	use proptest::prelude::*;

	#[test]
	fn timestamp_converts_offset_to_utc() {
		let est = FixedOffset::west_opt(5 * 3600).unwrap();
		let t = est.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
		assert_eq!(timestamp(&t), "2021-03-04T15:00:00.000Z");
	}

	#[test]
	fn timestamp_truncates_to_milliseconds() {
		let t = NaiveDate::from_ymd_opt(2024, 12, 31)
			.unwrap()
			.and_hms_nano_opt(23, 59, 59, 987_654_321)
			.unwrap()
			.and_utc();
		assert_eq!(timestamp(&t), "2024-12-31T23:59:59.987Z");
	}

	#[test]
	fn timestamp_crosses_date_line() {
		let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
		let t = tokyo.with_ymd_and_hms(2022, 1, 1, 3, 30, 0).unwrap();
		assert_eq!(timestamp(&t), "2021-12-31T18:30:00.000Z");
	}

	#[test]
	fn keen_properties_serialize_as_timestamp_field() {
		let t = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
		let json = serde_json::to_value(KeenProperties::at(&t)).unwrap();
		assert_eq!(json, serde_json::json!({"timestamp": "2020-06-01T12:00:00.000Z"}));
	}

	#[test]
	fn event_timestamp_sets_keen_object() {
		let t = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
		let event = Event::new().insert("page", "/home").timestamp(&t);
		assert_eq!(
			event.into_value(),
			serde_json::json!({
				"page": "/home",
				"keen": {"timestamp": "2020-06-01T12:00:00.000Z"}
			})
		);
	}

	#[test]
	fn event_timestamp_keeps_other_keen_keys() {
		let t = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
		let event = Event::new()
			.insert("keen", serde_json::json!({"addons": []}))
			.timestamp(&t);
		assert_eq!(
			event.get("keen"),
			Some(&serde_json::json!({"addons": [], "timestamp": "2020-06-01T12:00:00.000Z"}))
		);
	}

	#[test]
	fn event_serializes_as_plain_object() {
		let event = Event::new().insert("a", 1);
		assert_eq!(serde_json::to_string(&event).unwrap(), r#"{"a":1}"#);
	}

	#[test]
	fn event_merge_prefers_other() {
		let merged = Event::new()
			.insert("a", 1)
			.insert("b", 2)
			.merge(Event::new().insert("b", 20).insert("c", 3));
		assert_eq!(merged.len(), 3);
		assert_eq!(merged.get("b"), Some(&Value::from(20)));
	}

	proptest! {
		#[test]
		fn timestamp_always_matches_keen_format(
			secs in 0i64..4_102_444_800,
			millis in 0u32..1000,
			offset_hours in -12i32..=14,
		) {
			let utc = DateTime::from_timestamp(secs, millis * 1_000_000).unwrap();
			let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
			let local = utc.with_timezone(&offset);

			let formatted = timestamp(&local);
			prop_assert_eq!(formatted.len(), 24);
			prop_assert!(formatted.ends_with('Z'));
			prop_assert_eq!(&formatted[10..11], "T");
			prop_assert_eq!(&formatted[19..20], ".");

			let parsed = DateTime::parse_from_rfc3339(&formatted).unwrap();
			prop_assert_eq!(parsed.with_timezone(&Utc), utc);
		}
	}
}
