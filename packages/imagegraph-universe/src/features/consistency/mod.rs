//! # Universe Consistency Checker
//!
//! Hard invariants checked on the converged analysis universe before the
//! build continues: declared-type soundness of interface-typed slots,
//! entry-point isolation and build-time namespace leakage.
//!
//! ## Usage
//! ```text
//! let checker = UniverseChecker::new(config.checker(), config.parallel());
//! for violation in checker.check(&universe, &engine) {
//!     unsupported.add(violation);
//! }
//! ```

pub mod application;
pub mod infrastructure;

pub use application::UniverseChecker;
pub use infrastructure::NamingConventions;
