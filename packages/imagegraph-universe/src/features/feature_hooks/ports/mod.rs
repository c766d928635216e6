//! Ports (Interfaces) for feature hooks
//!
//! A `Feature` observes and extends the build at fixed checkpoints. Every
//! hook defaults to a no-op, so a feature implements only the checkpoints it
//! cares about. The access argument of each hook carries exactly the
//! capabilities that checkpoint allows.

use crate::features::analysis_universe::UniverseError;
use crate::features::feature_hooks::domain::access::{
    AfterAnalysisAccess, AnalysisAccess, CompilationAccess, DuringAnalysisAccess,
    ImageWriteAccess, OnAnalysisExitAccess,
};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Hook checkpoints, in build order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    DuringSetup,
    BeforeAnalysis,
    DuringAnalysis,
    AfterAnalysis,
    OnAnalysisExit,
    BeforeCompilation,
    AfterCompilation,
    BeforeHeapLayout,
    AfterHeapLayout,
    BeforeImageWrite,
    AfterImageWrite,
}

impl Checkpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuringSetup => "during_setup",
            Self::BeforeAnalysis => "before_analysis",
            Self::DuringAnalysis => "during_analysis",
            Self::AfterAnalysis => "after_analysis",
            Self::OnAnalysisExit => "on_analysis_exit",
            Self::BeforeCompilation => "before_compilation",
            Self::AfterCompilation => "after_compilation",
            Self::BeforeHeapLayout => "before_heap_layout",
            Self::AfterHeapLayout => "after_heap_layout",
            Self::BeforeImageWrite => "before_image_write",
            Self::AfterImageWrite => "after_image_write",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a feature hook
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Configuration input of the feature could not be loaded
    #[error("Feature '{feature}' could not load configuration '{}': {message}", path.display())]
    Configuration {
        feature: String,
        path: PathBuf,
        message: String,
    },

    /// Element registration after the feature froze its registrations
    #[error("Feature '{feature}' cannot register '{element}' after analysis has finished")]
    LateRegistration { feature: String, element: String },

    #[error("Feature '{feature}' failed: {message}")]
    Failed { feature: String, message: String },

    #[error(transparent)]
    Universe(#[from] UniverseError),
}

impl FeatureError {
    pub fn failed(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            feature: feature.into(),
            message: message.into(),
        }
    }
}

pub type FeatureResult = Result<(), FeatureError>;

/// A hook failure with the feature and checkpoint it came from
#[derive(Debug, Error)]
#[error("Feature '{feature}' failed during {checkpoint}: {source}")]
pub struct HookError {
    pub feature: String,
    pub checkpoint: Checkpoint,
    #[source]
    pub source: FeatureError,
}

/// Build plugin
///
/// # Example
/// ```ignore
/// struct KeepAlive(MethodId);
///
/// impl Feature for KeepAlive {
///     fn name(&self) -> &str { "keep-alive" }
///
///     fn during_analysis(&mut self, access: &mut DuringAnalysisAccess<'_>) -> FeatureResult {
///         if access.universe_mut().mark_method(self.0, ReachabilityFlag::Invoked) {
///             access.require_analysis_iteration();
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Feature: Send {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    fn during_setup(&mut self, _access: &mut AnalysisAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn before_analysis(&mut self, _access: &mut AnalysisAccess<'_>) -> FeatureResult {
        Ok(())
    }

    /// Called once per fixpoint iteration. Anything that makes new elements
    /// reachable must call `access.require_analysis_iteration()`.
    fn during_analysis(&mut self, _access: &mut DuringAnalysisAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn after_analysis(&mut self, _access: &AfterAnalysisAccess<'_>) -> FeatureResult {
        Ok(())
    }

    /// Always called once the analysis is over, whatever its outcome
    fn on_analysis_exit(&mut self, _access: &OnAnalysisExitAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn before_compilation(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn after_compilation(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn before_heap_layout(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn after_heap_layout(&mut self, _access: &CompilationAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn before_image_write(&mut self, _access: &ImageWriteAccess<'_>) -> FeatureResult {
        Ok(())
    }

    fn after_image_write(&mut self, _access: &ImageWriteAccess<'_>) -> FeatureResult {
        Ok(())
    }
}
