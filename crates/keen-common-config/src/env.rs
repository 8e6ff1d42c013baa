// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Credentials may be given directly (`KEEN_WRITE_KEY=...`) or through a
//! file path (`KEEN_WRITE_KEY_FILE=/run/secrets/keen_write_key`), the
//! convention used by Docker and Kubernetes secret mounts.

use std::path::PathBuf;
use std::{env, fs};

use keen_common_secret::SecretString;
use thiserror::Error;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `{var}_FILE` wins over `{var}`. A single trailing newline in the file is
/// stripped. Returns `Ok(None)` when neither is set.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	if let Ok(value) = env::var(var) {
		return Ok(Some(SecretString::new(value)));
	}

	Ok(None)
}

/// Reads a plain setting, treating an empty value as unset.
pub fn load_env(var: &str) -> Option<String> {
	env::var(var).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	// Each test owns a unique variable name so they can run in parallel.

	#[test]
	fn returns_none_when_not_set() {
		let var = "KEEN_TEST_UNSET_VAR_1";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn reads_direct_value() {
		let var = "KEEN_TEST_DIRECT_VAR_2";
		env::remove_var(format!("{var}_FILE"));
		env::set_var(var, "wk_direct");

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "wk_direct");

		env::remove_var(var);
	}

	#[test]
	fn file_takes_precedence_and_strips_one_newline() {
		let var = "KEEN_TEST_FILE_VAR_3";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "mk_from_file").unwrap();

		env::set_var(var, "mk_direct");
		env::set_var(format!("{var}_FILE"), file.path());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "mk_from_file");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_an_error() {
		let var = "KEEN_TEST_EMPTY_PATH_VAR_4";
		env::set_var(format!("{var}_FILE"), "");

		let err = load_secret_env(var).unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { .. }));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn missing_file_is_an_io_error() {
		let var = "KEEN_TEST_MISSING_FILE_VAR_5";
		env::set_var(format!("{var}_FILE"), "/nonexistent/keen/secret");

		let err = load_secret_env(var).unwrap_err();
		assert!(matches!(err, SecretEnvError::Io { .. }));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn load_env_treats_empty_as_unset() {
		let var = "KEEN_TEST_PLAIN_VAR_6";
		env::set_var(var, "");
		assert_eq!(load_env(var), None);

		env::set_var(var, "https://keen.example.com");
		assert_eq!(load_env(var).as_deref(), Some("https://keen.example.com"));

		env::remove_var(var);
	}
}
