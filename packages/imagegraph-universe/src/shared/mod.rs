//! Shared module - Common types used by every feature
//!
//! Identities, reachability flags and the TypeState lattice. Nothing in here
//! knows about the universe arenas or the driver.

pub mod models;

pub use models::*;
