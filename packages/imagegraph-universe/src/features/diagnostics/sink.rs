//! Thread-safe violation accumulator
//!
//! Order-agnostic: producers on any rayon worker append under the element's
//! key, and readers always get the entries sorted by key so reports are
//! deterministic regardless of scheduling.

use super::violation::Violation;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ViolationSink {
    entries: DashMap<String, Vec<Violation>>,
}

impl ViolationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append (never replaces an existing entry)
    pub fn add(&self, violation: Violation) {
        self.entries
            .entry(violation.key.clone())
            .or_default()
            .push(violation);
    }

    pub fn extend<I: IntoIterator<Item = Violation>>(&self, violations: I) {
        for violation in violations {
            self.add(violation);
        }
    }

    /// Number of violations (not keys)
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All violations sorted by key, then message
    pub fn sorted(&self) -> Vec<Violation> {
        let mut all: Vec<Violation> = self
            .entries
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        all.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.message.cmp(&b.message)));
        all
    }
}
