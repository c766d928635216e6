//! Analysis statistics
//!
//! Collected by the driver even when the analysis fails, so on-exit hooks and
//! the exit report always see what happened.

use crate::features::analysis_universe::UniverseCounts;
use crate::features::feature_hooks::IsolatedFailure;
use serde::Serialize;
use std::time::Duration;

/// One fixpoint iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub analysis_changed: bool,
    pub counts_before: UniverseCounts,
    pub counts_after: UniverseCounts,
    pub requested_iteration: bool,
}

impl IterationRecord {
    /// Elements added by features during this iteration
    pub fn feature_growth(&self) -> usize {
        (self.counts_after.types + self.counts_after.methods + self.counts_after.fields)
            .saturating_sub(self.counts_before.types + self.counts_before.methods + self.counts_before.fields)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStatistics {
    pub iterations: usize,
    pub iteration_log: Vec<IterationRecord>,
    pub engine_time_us: u64,
    pub features_time_us: u64,
    pub on_exit_failures: Vec<IsolatedFailure>,
    pub final_counts: UniverseCounts,
    pub unsupported_count: usize,
    pub delayed_init_count: usize,
    /// Outcome label, or `"error"` when the analysis failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl AnalysisStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_engine_time(&mut self, elapsed: Duration) {
        self.engine_time_us = self.engine_time_us.saturating_add(micros(elapsed));
    }

    pub(crate) fn add_features_time(&mut self, elapsed: Duration) {
        self.features_time_us = self.features_time_us.saturating_add(micros(elapsed));
    }

    pub fn last_iteration(&self) -> Option<&IterationRecord> {
        self.iteration_log.last()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
