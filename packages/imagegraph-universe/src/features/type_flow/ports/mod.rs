//! Ports (Interfaces) for the type-flow engine
//!
//! The fixpoint driver only depends on `TypeFlowEngine`; the production
//! points-to analysis and the reference worklist engine are both adapters.

use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::diagnostics::UnsupportedFeatures;
use crate::shared::models::{FieldId, MethodId, TypeId, TypeState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Type-flow engine has no body for reachable method '{0}'")]
    MissingBody(String),

    #[error("Malformed flow program in '{method}': {reason}")]
    MalformedProgram { method: String, reason: String },

    #[error("Type-flow engine failure: {0}")]
    Internal(String),
}

/// Points-to / type-flow computation driven to a fixed point
///
/// Implementations must be monotonic: type states only grow, reachability
/// flags are only added, and a call to `run_once` on an unchanged universe
/// eventually returns `false`.
pub trait TypeFlowEngine: Send + Sync {
    /// Propagate until the engine's internal worklist is empty. Newly
    /// reachable elements are flagged in `universe`; constructs the engine
    /// cannot model go to `unsupported`. Returns `true` if any type state,
    /// reachability flag or call edge changed during this call.
    fn run_once(
        &mut self,
        universe: &mut AnalysisUniverse,
        unsupported: &UnsupportedFeatures,
    ) -> Result<bool, EngineError>;

    /// State of parameter `index` (receiver excluded). `None` if the
    /// method was never analyzed.
    fn parameter_type_state(&self, method: MethodId, index: usize) -> Option<TypeState>;

    /// State of a field. `None` if the field was never written or read.
    fn field_type_state(&self, field: FieldId) -> Option<TypeState>;

    /// Trusted instances of `declared`: every instantiated subtype
    fn declared_type_state(&self, universe: &AnalysisUniverse, declared: TypeId) -> TypeState {
        TypeState::from_types(universe.instantiated_subtypes(declared))
    }

    /// Engine name for logs and statistics
    fn name(&self) -> &str {
        "type-flow"
    }
}
