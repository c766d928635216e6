//! Image build result

use crate::features::hosted_universe::HostedUniverse;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct BuildResult {
    pub image_name: String,
    /// Fixpoint iterations until convergence
    pub iterations: usize,
    /// `None` when the build returned right after analysis
    pub hosted: Option<HostedUniverse>,
    /// Compiled graphs released after compilation
    pub released_graphs: usize,
    /// Written image; `None` without a backend
    pub image_path: Option<PathBuf>,
    pub analysis_duration: Duration,
    pub total_duration: Duration,
}

impl BuildResult {
    pub fn stopped_after_analysis(&self) -> bool {
        self.hosted.is_none()
    }
}
