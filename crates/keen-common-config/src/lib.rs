// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration primitives shared by the Keen crates.
//!
//! - [`Secret<T>`] re-exported from [`keen_common_secret`]
//! - [`load_secret_env`] for reading credentials from `VAR` or `VAR_FILE`
//! - [`load_env`] for plain, non-secret settings

pub mod env;

pub use keen_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_env, load_secret_env, SecretEnvError};
