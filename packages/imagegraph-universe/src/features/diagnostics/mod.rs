//! # Deferred Diagnostics
//!
//! Unsupported features and universe violations are collected while work
//! continues and reported in aggregate once the analysis is over.

pub mod report;
pub mod sink;
pub mod unsupported;
pub mod violation;

pub use report::ViolationReport;
pub use sink::ViolationSink;
pub use unsupported::UnsupportedFeatures;
pub use violation::{Violation, ViolationKind};
