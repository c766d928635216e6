//! Common test utilities for imagegraph-universe
//!
//! Shared fixtures, builders and assertions for the integration tests.

#![allow(dead_code, unused_imports)]

mod assertions;
mod builders;
mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
