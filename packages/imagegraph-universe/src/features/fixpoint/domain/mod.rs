//! Fixpoint domain: per-build context, outcome, statistics, cancellation

pub mod context;
pub mod interrupt;
pub mod outcome;
pub mod statistics;

pub use context::BuildContext;
pub use interrupt::InterruptSignal;
pub use outcome::AnalysisOutcome;
pub use statistics::{AnalysisStatistics, IterationRecord};
