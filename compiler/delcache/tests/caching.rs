#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test code panics on unexpected state"
)]

//! Integration tests for delegate cache containers.
//!
//! Exercises the public API end to end: parallel creation through the
//! manager, deterministic finalization, and naming across incremental
//! generations and interactive submissions.
//!
//! # Running
//!
//! ```bash
//! cargo test -p delcache --test caching
//! ```

#[path = "caching/common.rs"]
mod common;

#[path = "caching/concurrency.rs"]
mod concurrency;

#[path = "caching/finalization.rs"]
mod finalization;

#[path = "caching/incremental.rs"]
mod incremental;

#[path = "caching/properties.rs"]
mod properties;
