//! Fatal analysis errors
//!
//! Contract violations that abort the analysis immediately. Non-convergence
//! and aggregated violations are outcomes, not errors.

use crate::features::analysis_universe::UniverseCounts;
use crate::features::feature_hooks::HookError;
use crate::features::type_flow::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A feature grew the universe without requesting another iteration
    #[error(
        "When a feature makes more types, methods, or fields reachable, it must require another analysis iteration via DuringAnalysisAccess::require_analysis_iteration() (iteration {iteration}, before: {before}, after: {after})"
    )]
    GrowthAccounting {
        iteration: usize,
        before: UniverseCounts,
        after: UniverseCounts,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Hook(#[from] HookError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
