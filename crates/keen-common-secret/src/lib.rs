// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for Keen API keys.
//!
//! The master, read and write keys of a Keen project are held in
//! [`SecretString`] so that they:
//!
//! - print as `[REDACTED]` through `Debug` and `Display` (and therefore
//!   through `tracing` fields)
//! - serialize as `"[REDACTED]"`
//! - are zeroized on drop
//! - are only readable through an explicit [`Secret::expose`] call
//!
//! ```
//! use keen_common_secret::SecretString;
//!
//! let write_key = SecretString::new("wk_123".to_string());
//! assert_eq!(format!("{write_key}"), "[REDACTED]");
//! assert_eq!(write_key.expose(), "wk_123");
//! ```
//!
//! [`redact_url`] and [`redact_query_param`] scrub a credential that travels
//! in a URL query string, which is how Keen accepts the read key on GET
//! requests.

use std::fmt;
use url::Url;
use zeroize::Zeroize;

/// The placeholder printed instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper for sensitive values that prevents accidental exposure.
///
/// There is no `Deref` impl; callers must go through [`Secret::expose`].
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: an API key.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Access the inner value. Call sites that read a key are meant to stand
	/// out in review.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped key is the empty string.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Secret::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

/// Replaces the value of every `name` pair in the query of `url` with
/// [`REDACTED`]. URLs without such a pair are left untouched.
pub fn redact_url(url: &mut Url, name: &str) {
	if !url.query_pairs().any(|(key, _)| key == name) {
		return;
	}

	let pairs: Vec<(String, String)> = url
		.query_pairs()
		.map(|(key, value)| {
			let value = if key == name {
				REDACTED.to_string()
			} else {
				value.into_owned()
			};
			(key.into_owned(), value)
		})
		.collect();

	url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// [`redact_url`] for a URL held as a string. Strings that do not parse
/// as a URL, or carry no `name` pair, are returned as given.
///
/// ```
/// use keen_common_secret::redact_query_param;
///
/// assert_eq!(
///     redact_query_param("https://x/q?a=1&api_key=abc", "api_key"),
///     "https://x/q?a=1&api_key=%5BREDACTED%5D",
/// );
/// ```
pub fn redact_query_param(url: &str, name: &str) -> String {
	let Ok(mut parsed) = Url::parse(url) else {
		return url.to_string();
	};
	if !parsed.query_pairs().any(|(key, _)| key == name) {
		return url.to_string();
	}

	redact_url(&mut parsed, name);
	parsed.into()
}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = T::deserialize(deserializer)?;
			Ok(Secret::new(inner))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let key = SecretString::from("master-key-value");
		assert_eq!(format!("{key}"), REDACTED);
		let debug = format!("{key:?}");
		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("master-key-value"));
	}

	#[test]
	fn expose_returns_inner_value() {
		let key = SecretString::from("wk");
		assert_eq!(key.expose(), "wk");
		assert!(!key.is_empty());
		assert!(SecretString::from("").is_empty());
	}

	#[test]
	fn clone_and_eq_compare_inner_values() {
		let a = SecretString::from("k");
		assert_eq!(a.clone(), a);
		assert_ne!(a, SecretString::from("other"));
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serialize_is_redacted_and_deserialize_populates() {
		let key = SecretString::from("super-secret");
		let json = serde_json::to_string(&key).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let back: SecretString = serde_json::from_str("\"abc\"").unwrap();
		assert_eq!(back.expose(), "abc");
	}

	fn query_value(url: &str, name: &str) -> Option<String> {
		Url::parse(url)
			.unwrap()
			.query_pairs()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.into_owned())
	}

	#[test]
	fn redact_leaves_urls_without_query_alone() {
		assert_eq!(
			redact_query_param("https://api.keen.io/3.0/projects/p/events", "api_key"),
			"https://api.keen.io/3.0/projects/p/events"
		);
		assert_eq!(redact_query_param("not a url?api_key=x", "api_key"), "not a url?api_key=x");
	}

	#[test]
	fn redact_only_touches_named_param() {
		let url = "https://h/p/queries/count?event_collection=clicks&api_key=secret&group_by=page#frag";
		assert_eq!(
			redact_query_param(url, "api_key"),
			"https://h/p/queries/count?event_collection=clicks&api_key=%5BREDACTED%5D&group_by=page#frag"
		);
	}

	#[test]
	fn redact_does_not_match_param_prefix() {
		let redacted = redact_query_param("https://h/q?api_key_hint=x&api_key=y", "api_key");
		assert_eq!(query_value(&redacted, "api_key_hint").as_deref(), Some("x"));
		assert_eq!(query_value(&redacted, "api_key").as_deref(), Some(REDACTED));
	}

	#[test]
	fn redact_url_without_named_param_is_unchanged() {
		let mut url = Url::parse("https://h/q?event_collection=page%20views").unwrap();
		redact_url(&mut url, "api_key");
		assert_eq!(url.as_str(), "https://h/q?event_collection=page%20views");
	}

	proptest! {
		#[test]
		fn redacted_url_never_contains_key(key in "[a-zA-Z0-9]{8,40}") {
			let url = format!("https://api.keen.io/3.0/projects/p/queries/count?event_collection=c&api_key={key}");
			let redacted = redact_query_param(&url, "api_key");
			prop_assert!(!redacted.contains(&key));
			prop_assert_eq!(query_value(&redacted, "api_key"), Some(REDACTED.to_string()));
		}

		#[test]
		fn display_never_contains_secret(inner in "[a-zA-Z0-9_-]{3,50}") {
			prop_assume!(!inner.contains("REDACTED"));
			let secret = SecretString::new(inner.clone());
			let shown = secret.to_string();
			prop_assert!(!shown.contains(&inner));
		}
	}
}
