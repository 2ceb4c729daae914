//! Demonstration collaborators for backoff-breaker
//!
//! This crate provides:
//! - A flaky HTTP endpoint that fails a configurable share of requests
//! - An HTTP GET operation usable as a protected [`Circuit`](backoff_breaker::Circuit)
//! - Command-line configuration and logging setup for the two binaries

pub mod cli;
pub mod fetch;
pub mod logging;
pub mod server;

pub use fetch::{FetchError, HttpFetch};
pub use server::{FlakyState, router};
