//! # Hosted Universe
//!
//! The compilation universe: a dense, immutable numbering of the reachable
//! program with interval-encoded type checks and virtual dispatch tables,
//! built exactly once after the analysis converges.
//!
//! ## Usage
//! ```text
//! let hosted = UniverseBuilder::from_config(&config).build(&ctx.universe)?;
//! let string = hosted.lookup_type(string_id).unwrap();
//! assert!(hosted.is_assignable_from(object, string));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::UniverseBuilder;
pub use domain::{
    CompiledGraph, HostedField, HostedFieldId, HostedMethod, HostedMethodId, HostedType,
    HostedTypeId, HostedUniverse, TypeCheckRange,
};
