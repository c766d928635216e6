//! Fixpoint driver
//!
//! Alternates type-flow runs with feature `during_analysis` hooks until no
//! feature asks for another iteration, then runs the after-analysis hooks
//! and the consistency checker.
//!
//! ```text
//! during_setup -> before_analysis
//! loop:
//!   interrupted?            -> Interrupted
//!   engine.run_once
//!   iterations > max?       -> DivergedIterationLimit | DivergedLiveLock
//!   during_analysis
//!   no request, growth      -> GrowthAccounting (fatal)
//!   no request              -> break
//! after_analysis -> checker -> report
//! on_analysis_exit (always, isolated)
//! ```

use crate::config::{AnalysisConfig, CheckerConfig, ParallelConfig, ValidatedConfig};
use crate::features::consistency::UniverseChecker;
use crate::features::feature_hooks::{
    AfterAnalysisAccess, AnalysisAccess, Checkpoint, DuringAnalysisAccess, FeatureRegistry,
    OnAnalysisExitAccess,
};
use crate::features::fixpoint::domain::context::BuildContext;
use crate::features::fixpoint::domain::outcome::AnalysisOutcome;
use crate::features::fixpoint::domain::statistics::IterationRecord;
use crate::features::fixpoint::error::{AnalysisError, AnalysisResult};
use crate::features::type_flow::TypeFlowEngine;
use std::time::Instant;
use tracing::{debug, info, warn};

const EXIT_AFTER_ANALYSIS_REASON: &str =
    "interrupted image construction as exit_after_analysis is set";

pub struct FixpointDriver {
    analysis: AnalysisConfig,
    checker: UniverseChecker,
}

impl FixpointDriver {
    pub fn new(analysis: AnalysisConfig, checker: CheckerConfig, parallel: ParallelConfig) -> Self {
        let checker =
            UniverseChecker::new(checker, parallel).close_to_all_threshold(analysis.close_to_all_threshold);
        Self { analysis, checker }
    }

    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self::new(config.analysis(), config.checker(), config.parallel())
    }

    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Run the analysis to a fixpoint. `on_analysis_exit` hooks run whatever
    /// the result; their failures are recorded in `ctx.statistics` and never
    /// replace the returned result.
    pub fn run_analysis(
        &self,
        ctx: &mut BuildContext,
        engine: &mut dyn TypeFlowEngine,
        features: &mut FeatureRegistry,
    ) -> AnalysisResult<AnalysisOutcome> {
        info!(
            engine = engine.name(),
            features = features.len(),
            max_iterations = self.analysis.max_iterations,
            "analysis started"
        );

        let result = self.analyze(ctx, engine, features);

        ctx.statistics.final_counts = ctx.universe.counts();
        ctx.statistics.unsupported_count = ctx.unsupported.len();
        ctx.statistics.delayed_init_count = ctx.class_init.len();
        ctx.statistics.outcome = Some(match &result {
            Ok(outcome) => outcome.label().to_string(),
            Err(_) => "error".to_string(),
        });

        let failures = {
            let access = OnAnalysisExitAccess::new(&ctx.universe, &ctx.statistics);
            features.dispatch_isolated(Checkpoint::OnAnalysisExit, |feature| {
                feature.on_analysis_exit(&access)
            })
        };
        ctx.statistics.on_exit_failures.extend(failures);

        if self.analysis.report_analysis_statistics {
            match ctx.statistics.to_json() {
                Ok(json) => info!(statistics = %json, "analysis statistics"),
                Err(e) => warn!(error = %e, "could not serialize analysis statistics"),
            }
        }

        match &result {
            Ok(outcome) => info!(%outcome, counts = %ctx.statistics.final_counts, "analysis finished"),
            Err(e) => warn!(error = %e, "analysis failed"),
        }
        result
    }

    fn analyze(
        &self,
        ctx: &mut BuildContext,
        engine: &mut dyn TypeFlowEngine,
        features: &mut FeatureRegistry,
    ) -> AnalysisResult<AnalysisOutcome> {
        {
            let mut access = AnalysisAccess::new(&mut ctx.universe, &mut ctx.class_init, &ctx.unsupported);
            features.dispatch(Checkpoint::DuringSetup, |feature| feature.during_setup(&mut access))?;
            features.dispatch(Checkpoint::BeforeAnalysis, |feature| {
                feature.before_analysis(&mut access)
            })?;
        }

        let max_iterations = self.analysis.max_iterations;
        let mut iterations = 0usize;
        loop {
            if ctx.interrupt.is_interrupted() {
                return Ok(AnalysisOutcome::Interrupted {
                    reason: ctx.interrupt.reason(),
                });
            }

            let engine_start = Instant::now();
            let analysis_changed = engine.run_once(&mut ctx.universe, &ctx.unsupported)?;
            ctx.statistics.add_engine_time(engine_start.elapsed());

            iterations += 1;
            ctx.statistics.iterations = iterations;
            if iterations > max_iterations {
                warn!(iterations, analysis_changed, "fixpoint iteration limit exceeded");
                return Ok(if analysis_changed {
                    AnalysisOutcome::DivergedIterationLimit { iterations }
                } else {
                    AnalysisOutcome::DivergedLiveLock { iterations }
                });
            }

            let before = ctx.universe.counts();
            let features_start = Instant::now();
            let requested = {
                let base = AnalysisAccess::new(&mut ctx.universe, &mut ctx.class_init, &ctx.unsupported);
                let mut access = DuringAnalysisAccess::new(base, &*engine);
                features.dispatch(Checkpoint::DuringAnalysis, |feature| {
                    feature.during_analysis(&mut access)
                })?;
                access.take_require_iteration()
            };
            ctx.statistics.add_features_time(features_start.elapsed());
            let after = ctx.universe.counts();

            ctx.statistics.iteration_log.push(IterationRecord {
                iteration: iterations,
                analysis_changed,
                counts_before: before,
                counts_after: after,
                requested_iteration: requested,
            });
            debug!(iteration = iterations, analysis_changed, requested, counts = %after, "analysis iteration");

            if !requested {
                if before != after {
                    return Err(AnalysisError::GrowthAccounting {
                        iteration: iterations,
                        before,
                        after,
                    });
                }
                break;
            }
        }

        {
            let access = AfterAnalysisAccess::new(&ctx.universe, &*engine, &ctx.class_init, &ctx.unsupported);
            features.dispatch(Checkpoint::AfterAnalysis, |feature| feature.after_analysis(&access))?;
        }

        let violations = self.checker.check(&ctx.universe, &*engine);
        debug!(violations = violations.len(), "universe checked");
        for violation in violations {
            ctx.unsupported.add(violation);
        }

        if let Err(report) = ctx.unsupported.report() {
            return Ok(AnalysisOutcome::ConvergedWithViolations { iterations, report });
        }

        if self.analysis.exit_after_analysis {
            return Ok(AnalysisOutcome::Interrupted {
                reason: EXIT_AFTER_ANALYSIS_REASON.to_string(),
            });
        }

        Ok(AnalysisOutcome::Converged { iterations })
    }
}
