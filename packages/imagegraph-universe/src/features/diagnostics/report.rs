//! Aggregated violation report

use super::violation::{Violation, ViolationKind};
use serde::Serialize;
use std::fmt;

/// Every deferred problem of one build, sorted by element key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    entries: Vec<Violation>,
}

impl ViolationReport {
    pub fn from_violations(mut entries: Vec<Violation>) -> Self {
        entries.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.message.cmp(&b.message)));
        Self { entries }
    }

    pub fn entries(&self) -> &[Violation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.entries.iter().filter(|v| v.kind == kind).count()
    }

    pub fn by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.entries.iter().filter(move |v| v.key == key)
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) found during analysis:", self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n  [{}] {}", entry.kind, entry)?;
        }
        Ok(())
    }
}
