//! Capability-scoped access types
//!
//! Setup, before-analysis and during-analysis hooks may mutate the analysis
//! universe. After analysis, everything is read-only.

use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::class_init::ClassInitStatistics;
use crate::features::diagnostics::UnsupportedFeatures;
use crate::features::fixpoint::AnalysisStatistics;
use crate::features::hosted_universe::HostedUniverse;
use crate::features::type_flow::TypeFlowEngine;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Mutable access for `during_setup` and `before_analysis`
pub struct AnalysisAccess<'a> {
    universe: &'a mut AnalysisUniverse,
    class_init: &'a mut ClassInitStatistics,
    unsupported: &'a UnsupportedFeatures,
}

impl<'a> AnalysisAccess<'a> {
    pub fn new(
        universe: &'a mut AnalysisUniverse,
        class_init: &'a mut ClassInitStatistics,
        unsupported: &'a UnsupportedFeatures,
    ) -> Self {
        Self {
            universe,
            class_init,
            unsupported,
        }
    }

    pub fn universe(&self) -> &AnalysisUniverse {
        self.universe
    }

    pub fn universe_mut(&mut self) -> &mut AnalysisUniverse {
        self.universe
    }

    pub fn class_init(&self) -> &ClassInitStatistics {
        self.class_init
    }

    pub fn class_init_mut(&mut self) -> &mut ClassInitStatistics {
        self.class_init
    }

    /// Defer an unsupported construct to the post-analysis report
    pub fn report_unsupported(&self, key: impl Into<String>, message: impl Into<String>) {
        self.unsupported.add_message(key, None, message);
    }
}

/// Mutable access for `during_analysis`, plus the iteration request flag
pub struct DuringAnalysisAccess<'a> {
    base: AnalysisAccess<'a>,
    engine: &'a dyn TypeFlowEngine,
    require_iteration: bool,
}

impl<'a> DuringAnalysisAccess<'a> {
    pub fn new(base: AnalysisAccess<'a>, engine: &'a dyn TypeFlowEngine) -> Self {
        Self {
            base,
            engine,
            require_iteration: false,
        }
    }

    /// Ask for another fixpoint iteration. Mandatory after making any new
    /// element reachable.
    pub fn require_analysis_iteration(&mut self) {
        self.require_iteration = true;
    }

    pub fn is_analysis_iteration_required(&self) -> bool {
        self.require_iteration
    }

    /// Read the flag and reset it
    pub fn take_require_iteration(&mut self) -> bool {
        std::mem::take(&mut self.require_iteration)
    }

    /// Current type-flow results (read-only)
    pub fn engine(&self) -> &dyn TypeFlowEngine {
        self.engine
    }
}

impl<'a> Deref for DuringAnalysisAccess<'a> {
    type Target = AnalysisAccess<'a>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<'a> DerefMut for DuringAnalysisAccess<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

/// Read-only access for `after_analysis`
pub struct AfterAnalysisAccess<'a> {
    universe: &'a AnalysisUniverse,
    engine: &'a dyn TypeFlowEngine,
    class_init: &'a ClassInitStatistics,
    unsupported: &'a UnsupportedFeatures,
}

impl<'a> AfterAnalysisAccess<'a> {
    pub fn new(
        universe: &'a AnalysisUniverse,
        engine: &'a dyn TypeFlowEngine,
        class_init: &'a ClassInitStatistics,
        unsupported: &'a UnsupportedFeatures,
    ) -> Self {
        Self {
            universe,
            engine,
            class_init,
            unsupported,
        }
    }

    pub fn universe(&self) -> &AnalysisUniverse {
        self.universe
    }

    pub fn engine(&self) -> &dyn TypeFlowEngine {
        self.engine
    }

    pub fn class_init(&self) -> &ClassInitStatistics {
        self.class_init
    }

    pub fn report_unsupported(&self, key: impl Into<String>, message: impl Into<String>) {
        self.unsupported.add_message(key, None, message);
    }
}

/// Read-only access for `on_analysis_exit`
pub struct OnAnalysisExitAccess<'a> {
    universe: &'a AnalysisUniverse,
    statistics: &'a AnalysisStatistics,
}

impl<'a> OnAnalysisExitAccess<'a> {
    pub fn new(universe: &'a AnalysisUniverse, statistics: &'a AnalysisStatistics) -> Self {
        Self {
            universe,
            statistics,
        }
    }

    pub fn universe(&self) -> &AnalysisUniverse {
        self.universe
    }

    /// Statistics of the analysis that just ended
    pub fn statistics(&self) -> &AnalysisStatistics {
        self.statistics
    }
}

/// Read-only access for compilation and heap-layout hooks
pub struct CompilationAccess<'a> {
    analysis: &'a AnalysisUniverse,
    hosted: &'a HostedUniverse,
    unsupported: &'a UnsupportedFeatures,
}

impl<'a> CompilationAccess<'a> {
    pub fn new(
        analysis: &'a AnalysisUniverse,
        hosted: &'a HostedUniverse,
        unsupported: &'a UnsupportedFeatures,
    ) -> Self {
        Self {
            analysis,
            hosted,
            unsupported,
        }
    }

    pub fn analysis_universe(&self) -> &AnalysisUniverse {
        self.analysis
    }

    pub fn hosted_universe(&self) -> &HostedUniverse {
        self.hosted
    }

    pub fn report_unsupported(&self, key: impl Into<String>, message: impl Into<String>) {
        self.unsupported.add_message(key, None, message);
    }
}

/// Read-only access for image-write hooks
pub struct ImageWriteAccess<'a> {
    hosted: &'a HostedUniverse,
    image_name: &'a str,
    image_path: Option<&'a Path>,
}

impl<'a> ImageWriteAccess<'a> {
    pub fn new(hosted: &'a HostedUniverse, image_name: &'a str, image_path: Option<&'a Path>) -> Self {
        Self {
            hosted,
            image_name,
            image_path,
        }
    }

    pub fn hosted_universe(&self) -> &HostedUniverse {
        self.hosted
    }

    pub fn image_name(&self) -> &str {
        self.image_name
    }

    /// Path of the written image; `None` before the image is written
    pub fn image_path(&self) -> Option<&Path> {
        self.image_path
    }
}
