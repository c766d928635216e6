//! # Fixpoint Driver
//!
//! Runs the type-flow engine and the `during_analysis` hooks alternately
//! until the reachable universe stops growing, enforcing that any feature
//! that grows the universe asks for another iteration.
//!
//! ## Usage
//! ```text
//! let mut ctx = BuildContext::new(universe);
//! let driver = FixpointDriver::from_config(&config);
//! match driver.run_analysis(&mut ctx, &mut engine, &mut features)? {
//!     AnalysisOutcome::Converged { iterations } => { /* build the hosted universe */ }
//!     other => return other.into_result().map(|_| ()),
//! }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub use application::FixpointDriver;
pub use domain::{
    AnalysisOutcome, AnalysisStatistics, BuildContext, InterruptSignal, IterationRecord,
};
pub use error::{AnalysisError, AnalysisResult};
