//! Universe consistency checker
//!
//! Read-only pass over the converged analysis universe. Three rules:
//!
//! 1. Declared-type soundness: values flowing into interface-typed
//!    parameters and fields must be instances of the declared interface.
//!    Only interface types are checked; class-typed slots are trusted.
//! 2. Entry-point isolation: entry points use the native calling convention
//!    and must not be called from inside the program.
//! 3. Build-time namespace leakage (optional): nothing from a build-time
//!    namespace may be reachable at run time.
//!
//! Elements are checked in parallel; results are sorted by key.

use crate::config::{CheckerConfig, ParallelConfig};
use crate::features::analysis_universe::{AnalysisField, AnalysisMethod, AnalysisType, AnalysisUniverse};
use crate::features::consistency::infrastructure::naming::NamingConventions;
use crate::features::diagnostics::{Violation, ViolationKind, ViolationSink};
use crate::features::type_flow::TypeFlowEngine;
use crate::shared::models::{TypeId, TypeState, DEFAULT_CLOSE_TO_ALL_THRESHOLD};
use tracing::debug;
#[cfg(feature = "parallel")]
use tracing::warn;

const FOLD_ANNOTATION: &str = "Fold";

pub struct UniverseChecker {
    config: CheckerConfig,
    parallel: ParallelConfig,
    naming: NamingConventions,
    close_to_all_threshold: usize,
}

/// Shared, read-only inputs of one check run
struct CheckInput<'a> {
    universe: &'a AnalysisUniverse,
    engine: &'a dyn TypeFlowEngine,
    instantiated: Vec<TypeId>,
}

impl UniverseChecker {
    pub fn new(config: CheckerConfig, parallel: ParallelConfig) -> Self {
        let naming = NamingConventions::new(config.namespace_markers.clone());
        Self {
            config,
            parallel,
            naming,
            close_to_all_threshold: DEFAULT_CLOSE_TO_ALL_THRESHOLD,
        }
    }

    /// Type states above this size may print as "close to all instantiated"
    pub fn close_to_all_threshold(mut self, threshold: usize) -> Self {
        self.close_to_all_threshold = threshold;
        self
    }

    /// Run every rule. Returned violations are sorted by key, then message.
    pub fn check(&self, universe: &AnalysisUniverse, engine: &dyn TypeFlowEngine) -> Vec<Violation> {
        let input = CheckInput {
            universe,
            engine,
            instantiated: universe.instantiated_types(),
        };
        let sink = ViolationSink::new();

        self.run(&input, &sink);

        let violations = sink.sorted();
        debug!(
            methods = universe.methods().len(),
            fields = universe.fields().len(),
            violations = violations.len(),
            "universe consistency check finished"
        );
        violations
    }

    fn run(&self, input: &CheckInput<'_>, sink: &ViolationSink) {
        if !(self.parallel.enable_rayon && self.try_run_parallel(input, sink)) {
            self.run_sequential(input, sink);
        }
    }

    /// `false` when no pool could be built; nothing has been checked then
    #[cfg(feature = "parallel")]
    fn try_run_parallel(&self, input: &CheckInput<'_>, sink: &ViolationSink) -> bool {
        use rayon::prelude::*;

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallel.effective_workers())
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "could not build checker thread pool, checking sequentially");
                return false;
            }
        };

        pool.install(|| {
            let universe = input.universe;
            universe
                .methods()
                .par_iter()
                .for_each(|method| self.check_method(input, method, sink));
            universe
                .fields()
                .par_iter()
                .for_each(|field| self.check_field(input, field, sink));
            universe.types().par_iter().for_each(|ty| self.check_type(ty, sink));
        });
        true
    }

    #[cfg(not(feature = "parallel"))]
    fn try_run_parallel(&self, _input: &CheckInput<'_>, _sink: &ViolationSink) -> bool {
        false
    }

    fn run_sequential(&self, input: &CheckInput<'_>, sink: &ViolationSink) {
        for method in input.universe.methods() {
            self.check_method(input, method, sink);
        }
        for field in input.universe.fields() {
            self.check_field(input, field, sink);
        }
        for ty in input.universe.types() {
            self.check_type(ty, sink);
        }
    }

    fn check_method(&self, input: &CheckInput<'_>, method: &AnalysisMethod, sink: &ViolationSink) {
        let universe = input.universe;
        let key = method.qualified_name();

        for (index, &declared) in method.parameter_types().iter().enumerate() {
            if !universe.ty(declared).is_interface() {
                continue;
            }
            let Some(state) = input.engine.parameter_type_state(method.id(), index) else {
                continue;
            };
            if let Some(observed) = self.incompatible(input, &state, declared) {
                sink.add(
                    Violation::new(
                        ViolationKind::DeclaredTypeMismatch,
                        key,
                        format!(
                            "Parameter {} of {} has declared type {} which is incompatible with types in state: {}",
                            index,
                            key,
                            universe.type_name(declared),
                            observed
                        ),
                    )
                    .in_method(method.id()),
                );
            }
        }

        if method.is_entry_point() && !method.invoked_by().is_empty() {
            let callers: Vec<&str> = method
                .invoked_by()
                .iter()
                .map(|&caller| universe.method(caller).qualified_name())
                .collect();
            sink.add(
                Violation::new(
                    ViolationKind::EntryPointCalledInternally,
                    key,
                    format!(
                        "Native entry point is also called from within the program. Invocations: {}",
                        callers.join(", ")
                    ),
                )
                .in_method(method.id()),
            );
        }

        if self.config.verify_naming_conventions
            && method.is_reachable()
            && !method.has_annotation(FOLD_ANNOTATION)
            && self.naming.is_leak(key)
        {
            sink.add(
                Violation::new(ViolationKind::HostedElementLeak, key, NamingConventions::message(key))
                    .in_method(method.id()),
            );
        }
    }

    fn check_field(&self, input: &CheckInput<'_>, field: &AnalysisField, sink: &ViolationSink) {
        let universe = input.universe;
        let key = field.qualified_name();
        let declared = field.declared_type();

        if universe.ty(declared).is_interface() {
            if let Some(state) = input.engine.field_type_state(field.id()) {
                if let Some(observed) = self.incompatible(input, &state, declared) {
                    sink.add(Violation::new(
                        ViolationKind::DeclaredTypeMismatch,
                        key,
                        format!(
                            "Field {} has declared type {} which is incompatible with types in state: {}",
                            key,
                            universe.type_name(declared),
                            observed
                        ),
                    ));
                }
            }
        }

        if self.config.verify_naming_conventions && field.is_accessed() && self.naming.is_leak(key) {
            sink.add(Violation::new(
                ViolationKind::HostedElementLeak,
                key,
                NamingConventions::message(key),
            ));
        }
    }

    fn check_type(&self, ty: &AnalysisType, sink: &ViolationSink) {
        if !self.config.verify_naming_conventions {
            return;
        }
        if (ty.is_instantiated() || ty.is_in_type_check()) && self.naming.is_leak(ty.name()) {
            sink.add(Violation::new(
                ViolationKind::HostedElementLeak,
                ty.name(),
                NamingConventions::message(ty.name()),
            ));
        }
    }

    /// Rendered `state - trusted(declared)` when non-empty
    fn incompatible(&self, input: &CheckInput<'_>, state: &TypeState, declared: TypeId) -> Option<String> {
        let trusted = input.engine.declared_type_state(input.universe, declared);
        let observed = state.subtract(&trusted, &input.instantiated);
        if observed.is_empty() {
            return None;
        }
        if observed.close_to_all_instantiated(input.instantiated.len(), self.close_to_all_threshold) {
            return Some("close to all instantiated".to_string());
        }
        Some(input.universe.format_type_state(&observed))
    }
}
