//! Class-initialization statistics
//!
//! Per-build record of types whose initializers run at image run time
//! instead of build time, queryable by features through their access types.

pub mod statistics;

pub use statistics::{ClassInitStatistics, DelayedInitReason};
