//! Terminal analysis outcome

use crate::errors::BuildError;
use crate::features::diagnostics::ViolationReport;
use std::fmt;

/// How the fixpoint loop ended. Only `Converged` lets the build continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Converged { iterations: usize },
    ConvergedWithViolations { iterations: usize, report: ViolationReport },
    /// Iteration ceiling hit while the engine still found changes
    DivergedIterationLimit { iterations: usize },
    /// Iteration ceiling hit with a stable engine: a feature keeps asking
    /// for iterations without anything changing
    DivergedLiveLock { iterations: usize },
    Interrupted { reason: String },
}

impl AnalysisOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Converged { .. } => "converged",
            Self::ConvergedWithViolations { .. } => "converged_with_violations",
            Self::DivergedIterationLimit { .. } => "diverged_iteration_limit",
            Self::DivergedLiveLock { .. } => "diverged_live_lock",
            Self::Interrupted { .. } => "interrupted",
        }
    }

    /// Iteration count for every outcome but `Interrupted`
    pub fn iterations(&self) -> Option<usize> {
        match self {
            Self::Converged { iterations }
            | Self::ConvergedWithViolations { iterations, .. }
            | Self::DivergedIterationLimit { iterations }
            | Self::DivergedLiveLock { iterations } => Some(*iterations),
            Self::Interrupted { .. } => None,
        }
    }

    /// `Ok(iterations)` for `Converged`, the matching `BuildError` otherwise
    pub fn into_result(self) -> Result<usize, BuildError> {
        match self {
            Self::Converged { iterations } => Ok(iterations),
            Self::ConvergedWithViolations { report, .. } => Err(BuildError::Unsupported(report)),
            Self::DivergedIterationLimit { iterations } => Err(BuildError::IterationLimit { iterations }),
            Self::DivergedLiveLock { iterations } => Err(BuildError::LiveLock { iterations }),
            Self::Interrupted { reason } => Err(BuildError::Interrupted { reason }),
        }
    }
}

impl fmt::Display for AnalysisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { iterations } => write!(f, "converged after {} iterations", iterations),
            Self::ConvergedWithViolations { iterations, report } => write!(
                f,
                "converged after {} iterations with {} problem(s)",
                iterations,
                report.len()
            ),
            Self::DivergedIterationLimit { iterations } | Self::DivergedLiveLock { iterations } => {
                write!(f, "diverged after {} iterations", iterations)
            }
            Self::Interrupted { reason } => write!(f, "interrupted: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_converged_continues() {
        assert_eq!(AnalysisOutcome::Converged { iterations: 3 }.into_result().unwrap(), 3);

        let err = AnalysisOutcome::DivergedLiveLock { iterations: 1001 }.into_result().unwrap_err();
        assert!(err.to_string().contains("DID NOT find a change"));

        let err = AnalysisOutcome::DivergedIterationLimit { iterations: 1001 }
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("DID find a change"));

        let err = AnalysisOutcome::Interrupted { reason: "stop".into() }.into_result().unwrap_err();
        assert!(matches!(err, BuildError::Interrupted { .. }));
    }

    #[test]
    fn test_labels_and_iterations() {
        let outcome = AnalysisOutcome::ConvergedWithViolations {
            iterations: 2,
            report: ViolationReport::default(),
        };
        assert_eq!(outcome.label(), "converged_with_violations");
        assert_eq!(outcome.iterations(), Some(2));
        assert!(!outcome.is_converged());
        assert_eq!(AnalysisOutcome::Interrupted { reason: "x".into() }.iterations(), None);
    }
}
