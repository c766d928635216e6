//! Analysis universe application layer

pub mod universe;

pub use universe::{AnalysisUniverse, UniverseCounts};
