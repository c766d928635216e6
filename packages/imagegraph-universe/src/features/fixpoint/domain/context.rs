//! Per-build state
//!
//! Everything one image build owns lives here and is passed explicitly; two
//! builds in one process never share state.

use crate::features::analysis_universe::AnalysisUniverse;
use crate::features::class_init::ClassInitStatistics;
use crate::features::diagnostics::UnsupportedFeatures;
use crate::features::fixpoint::domain::interrupt::InterruptSignal;
use crate::features::fixpoint::domain::statistics::AnalysisStatistics;

#[derive(Debug, Default)]
pub struct BuildContext {
    pub universe: AnalysisUniverse,
    pub unsupported: UnsupportedFeatures,
    pub class_init: ClassInitStatistics,
    pub interrupt: InterruptSignal,
    pub statistics: AnalysisStatistics,
}

impl BuildContext {
    pub fn new(universe: AnalysisUniverse) -> Self {
        Self {
            universe,
            ..Self::default()
        }
    }

    /// Share an externally owned interrupt signal
    pub fn with_interrupt(mut self, interrupt: InterruptSignal) -> Self {
        self.interrupt = interrupt;
        self
    }
}
