//! # crank
//!
//! A typed client for the GitHub Actions surface of the REST API:
//! workflows, workflow runs, jobs, and log-download URL resolution.
//!
//! Construct a [`Client`] from a [`Config`] (or from the `GITHUB_TOKEN`
//! environment variable) and call the resource methods on it. Every call
//! is a single request/response round trip — two at most, for the
//! log-URL endpoints that may answer with one permanent redirect — and
//! returns either a decoded value with its [`ResponseMeta`] or a
//! [`CrankError`] the caller can inspect by kind. The client holds no
//! per-call mutable state and is safe to share across tasks.

pub mod client;
pub mod error;
pub mod options;
pub mod types;

mod endpoints;
mod redirect;

pub use client::{Client, Config, RateLimit, ResponseMeta};
pub use error::{CrankError, Result};
pub use options::ListOptions;
pub use types::*;
