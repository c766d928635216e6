//! Error types for imagegraph-universe
//!
//! `BuildError` is what an image build ultimately fails with. Layer errors
//! (configuration, analysis, hooks, backend) convert into it with `?`.

use crate::config::ConfigError;
use crate::features::analysis_universe::UniverseError;
use crate::features::diagnostics::ViolationReport;
use crate::features::feature_hooks::HookError;
use crate::features::fixpoint::AnalysisError;
use crate::pipeline::BackendError;
use thiserror::Error;

/// Main error type for image builds
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(
        "Static analysis did not reach a fix point after {iterations} iterations because a feature keeps \
         requesting new analysis iterations. The analysis itself DID find a change in type states in the last iteration."
    )]
    IterationLimit { iterations: usize },

    #[error(
        "Static analysis did not reach a fix point after {iterations} iterations because a feature keeps \
         requesting new analysis iterations. The analysis itself DID NOT find a change in type states in the last iteration."
    )]
    LiveLock { iterations: usize },

    /// Unsupported features and universe violations found by the analysis
    #[error("{0}")]
    Unsupported(ViolationReport),

    #[error("Image build interrupted: {reason}")]
    Interrupted { reason: String },

    #[error("Expected at least one entry point in the image, found none")]
    NoEntryPoints,

    #[error("Main entry point '{name}' not found among the image entry points")]
    MainEntryPointNotFound { name: String },

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Universe(#[from] UniverseError),
}

impl BuildError {
    /// Contract violations that point at a buggy feature or engine
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::IterationLimit { .. }
                | Self::LiveLock { .. }
                | Self::Analysis(AnalysisError::GrowthAccounting { .. })
        )
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Analysis(_) => "analysis",
            Self::IterationLimit { .. } | Self::LiveLock { .. } => "divergence",
            Self::Unsupported(_) => "unsupported",
            Self::Interrupted { .. } => "interrupted",
            Self::NoEntryPoints | Self::MainEntryPointNotFound { .. } => "entry_point",
            Self::Hook(_) => "feature",
            Self::Backend(_) => "backend",
            Self::Universe(_) => "universe",
        }
    }
}

/// Result type alias for image builds
pub type Result<T> = std::result::Result<T, BuildError>;
