//! Fixpoint driver integration tests
//!
//! Convergence, growth accounting, divergence detection, interruption and
//! on-exit isolation against the worklist engine.

mod common;

use common::*;
use imagegraph_universe::config::{AnalysisConfig, CheckerConfig, ParallelConfig};
use imagegraph_universe::errors::BuildError;
use imagegraph_universe::features::analysis_universe::AnalysisUniverse;
use imagegraph_universe::features::diagnostics::UnsupportedFeatures;
use imagegraph_universe::features::class_init::DelayedInitReason;
use imagegraph_universe::features::feature_hooks::{AnalysisAccess, Feature, FeatureRegistry, FeatureResult};
use imagegraph_universe::features::fixpoint::{AnalysisError, AnalysisOutcome, FixpointDriver, InterruptSignal};
use imagegraph_universe::features::type_flow::{EngineError, TypeFlowEngine};
use imagegraph_universe::shared::models::{FieldId, MethodId, TypeState};
use pretty_assertions::assert_eq;

fn driver(max_iterations: usize) -> FixpointDriver {
    FixpointDriver::new(
        AnalysisConfig::default().max_iterations(max_iterations),
        CheckerConfig::default(),
        ParallelConfig::default().enable_rayon(false),
    )
}

/// Reports a change on every run
struct ChurningEngine;

impl TypeFlowEngine for ChurningEngine {
    fn run_once(
        &mut self,
        _universe: &mut AnalysisUniverse,
        _unsupported: &UnsupportedFeatures,
    ) -> Result<bool, EngineError> {
        Ok(true)
    }

    fn parameter_type_state(&self, _method: MethodId, _index: usize) -> Option<TypeState> {
        None
    }

    fn field_type_state(&self, _field: FieldId) -> Option<TypeState> {
        None
    }
}

/// Delays the initializer of one class during setup
struct DelaysInit(&'static str);

impl Feature for DelaysInit {
    fn name(&self) -> &str {
        "delays-init"
    }

    fn during_setup(&mut self, access: &mut AnalysisAccess<'_>) -> FeatureResult {
        access
            .class_init_mut()
            .add_delayed_initialization_reason(self.0, DelayedInitReason::SideEffects("opens a socket".to_string()));
        Ok(())
    }
}

#[test]
fn test_shapes_program_converges_in_one_iteration() {
    init_tracing();
    let mut s = shapes();
    let (circle, square, circle_area, square_area) = (s.circle, s.square, s.circle_area, s.square_area);
    s.main_draws(circle);
    let (mut ctx, mut engine) = s.builder.build();

    let outcome = driver(10)
        .run_analysis(&mut ctx, &mut engine, &mut FeatureRegistry::new())
        .unwrap();

    assert_eq!(outcome, AnalysisOutcome::Converged { iterations: 1 });
    assert!(ctx.universe.ty(circle).is_instantiated());
    assert!(!ctx.universe.ty(square).is_instantiated());
    assert!(ctx.universe.method(circle_area).is_implementation_invoked());
    assert!(!ctx.universe.method(square_area).is_reachable());
    assert!(ctx.unsupported.is_empty());
}

#[test]
fn test_requested_growth_converges_after_extra_iterations() {
    let mut s = shapes();
    let main_type = s.main_type;
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let mut features = FeatureRegistry::new().with(GrowingFeature::new(main_type, 3));

    let outcome = driver(10).run_analysis(&mut ctx, &mut engine, &mut features).unwrap();

    assert_eq!(outcome, AnalysisOutcome::Converged { iterations: 4 });
    assert_monotonic_counts(&ctx.statistics);
    let growth: Vec<usize> = ctx.statistics.iteration_log.iter().map(|r| r.feature_growth()).collect();
    assert_eq!(growth, vec![1, 1, 1, 0]);
    assert!(ctx.universe.lookup_method("app.Main.generated2()").is_some());
}

#[test]
fn test_growth_without_request_is_fatal() {
    let mut s = shapes();
    let main_type = s.main_type;
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let mut features = FeatureRegistry::new().with(GrowingFeature::new(main_type, 1).without_request());

    let err = driver(10).run_analysis(&mut ctx, &mut engine, &mut features).unwrap_err();

    assert!(matches!(err, AnalysisError::GrowthAccounting { iteration: 1, .. }));
    assert!(err.to_string().contains("require_analysis_iteration"));
    let err: BuildError = err.into();
    assert!(err.is_contract_violation());
}

#[test]
fn test_live_lock_when_nothing_changes() {
    let mut s = shapes();
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let mut features = FeatureRegistry::new().with(AlwaysRequest);

    let outcome = driver(5).run_analysis(&mut ctx, &mut engine, &mut features).unwrap();

    assert_eq!(outcome, AnalysisOutcome::DivergedLiveLock { iterations: 6 });
    let err = outcome.into_result().unwrap_err();
    assert!(err.to_string().contains("DID NOT find a change"));
}

#[test]
fn test_iteration_limit_when_engine_keeps_changing() {
    let s = shapes();
    let (mut ctx, _) = s.builder.build();
    let mut features = FeatureRegistry::new().with(AlwaysRequest);

    let outcome = driver(3)
        .run_analysis(&mut ctx, &mut ChurningEngine, &mut features)
        .unwrap();

    assert_eq!(outcome, AnalysisOutcome::DivergedIterationLimit { iterations: 4 });
    assert_eq!(ctx.statistics.outcome.as_deref(), Some("diverged_iteration_limit"));
}

#[test]
fn test_external_interrupt() {
    let s = shapes();
    let (ctx, mut engine) = s.builder.build();
    let signal = InterruptSignal::new();
    let mut ctx = ctx.with_interrupt(signal.clone());
    signal.interrupt("build cancelled by user");

    let outcome = driver(10)
        .run_analysis(&mut ctx, &mut engine, &mut FeatureRegistry::new())
        .unwrap();

    assert_eq!(
        outcome,
        AnalysisOutcome::Interrupted {
            reason: "build cancelled by user".to_string()
        }
    );
}

#[test]
fn test_on_exit_failures_are_isolated() {
    let mut s = shapes();
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let recorder = CheckpointRecorder::new();
    let log = recorder.log.clone();
    let mut features = FeatureRegistry::new()
        .with(BrokenExit { panic: true })
        .with(BrokenExit { panic: false })
        .with(recorder);

    let outcome = driver(10).run_analysis(&mut ctx, &mut engine, &mut features).unwrap();

    assert!(outcome.is_converged());
    let failures = &ctx.statistics.on_exit_failures;
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].feature, "panicking-exit");
    assert!(failures[0].panicked);
    assert!(failures[0].message.contains("exit hook exploded"));
    assert_eq!(failures[1].feature, "failing-exit");
    assert!(!failures[1].panicked);
    // Later features still ran
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_on_exit_runs_after_fatal_error() {
    let mut s = shapes();
    let main_type = s.main_type;
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let recorder = CheckpointRecorder::new();
    let log = recorder.log.clone();
    let mut features = FeatureRegistry::new()
        .with(GrowingFeature::new(main_type, 1).without_request())
        .with(recorder);

    assert!(driver(10).run_analysis(&mut ctx, &mut engine, &mut features).is_err());
    assert_eq!(log.lock().len(), 1);
    assert_eq!(ctx.statistics.outcome.as_deref(), Some("error"));
}

#[test]
fn test_delayed_initializations_reach_statistics() {
    let mut s = shapes();
    s.main_draws(s.circle);
    let (mut ctx, mut engine) = s.builder.build();
    let mut features = FeatureRegistry::new().with(DelaysInit("Lapp/Circle;"));

    let outcome = driver(10).run_analysis(&mut ctx, &mut engine, &mut features).unwrap();

    assert!(outcome.is_converged());
    assert_eq!(ctx.statistics.delayed_init_count, 1);
    assert!(ctx.class_init.has_side_effects("app.Circle"));
    assert_eq!(ctx.class_init.delayed_reason("app.Circle"), Some("opens a socket"));
}
