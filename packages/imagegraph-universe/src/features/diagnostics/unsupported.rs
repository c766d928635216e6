//! Deferred unsupported-feature reporting
//!
//! The engine and features record constructs they cannot handle while the
//! analysis keeps going; everything is flushed in one report after
//! convergence.

use super::report::ViolationReport;
use super::sink::ViolationSink;
use super::violation::{Violation, ViolationKind};
use crate::shared::models::MethodId;
use tracing::debug;

#[derive(Debug, Default)]
pub struct UnsupportedFeatures {
    sink: ViolationSink,
}

impl UnsupportedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unsupported construct under `key` (qualified element name)
    pub fn add_message(
        &self,
        key: impl Into<String>,
        method: Option<MethodId>,
        message: impl Into<String>,
    ) {
        let mut violation = Violation::new(ViolationKind::UnsupportedFeature, key, message);
        violation.method = method;
        debug!(key = %violation.key, "unsupported feature recorded");
        self.sink.add(violation);
    }

    /// Record an already classified violation
    pub fn add(&self, violation: Violation) {
        self.sink.add(violation);
    }

    pub fn exists(&self) -> bool {
        !self.sink.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.is_empty()
    }

    pub fn messages(&self) -> Vec<Violation> {
        self.sink.sorted()
    }

    /// `Err` with every recorded entry when anything was recorded
    pub fn report(&self) -> Result<(), ViolationReport> {
        if self.sink.is_empty() {
            Ok(())
        } else {
            Err(ViolationReport::from_violations(self.sink.sorted()))
        }
    }
}
