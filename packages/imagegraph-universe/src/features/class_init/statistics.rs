//! Delayed class-initialization statistics
//!
//! Records which types had their initializer delayed to run time and why.
//! Owned by the build context, so two builds in one process never share it.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Why a type's initializer could not run at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", content = "message", rename_all = "snake_case")]
pub enum DelayedInitReason {
    /// The initializer has observable side effects
    SideEffects(String),
    /// A referenced type has no definition on the image class path
    MissingDefinition(String),
    /// Any other failure while running the initializer
    Other(String),
}

impl DelayedInitReason {
    pub fn message(&self) -> &str {
        match self {
            Self::SideEffects(m) | Self::MissingDefinition(m) | Self::Other(m) => m,
        }
    }
}

/// Nothing in the crate records into this on its own. Class-initialization
/// features populate it through `AnalysisAccess::class_init_mut` during setup
/// or analysis, and the driver copies its size into
/// `AnalysisStatistics::delayed_init_count`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassInitStatistics {
    side_effects: FxHashMap<String, String>,
    missing_definitions: FxHashMap<String, String>,
    other: FxHashMap<String, String>,
}

impl ClassInitStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delayed initializer. Descriptor names (`La/b/C;`) are
    /// normalized to qualified names (`a.b.C`).
    pub fn add_delayed_initialization_reason(&mut self, class_name: &str, reason: DelayedInitReason) {
        let name = normalize_class_name(class_name);
        match reason {
            DelayedInitReason::SideEffects(m) => self.side_effects.insert(name, m),
            DelayedInitReason::MissingDefinition(m) => self.missing_definitions.insert(name, m),
            DelayedInitReason::Other(m) => self.other.insert(name, m),
        };
    }

    pub fn has_side_effects(&self, class_name: &str) -> bool {
        self.side_effects.contains_key(class_name)
    }

    /// Message of the first matching category: side effects, missing
    /// definition, other
    pub fn delayed_reason(&self, class_name: &str) -> Option<&str> {
        [&self.side_effects, &self.missing_definitions, &self.other]
            .into_iter()
            .find_map(|map| map.get(class_name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.side_effects.len() + self.missing_definitions.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_class_name(class_name: &str) -> String {
    match class_name
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        Some(inner) => inner.replace('/', "."),
        None => class_name.to_string(),
    }
}
