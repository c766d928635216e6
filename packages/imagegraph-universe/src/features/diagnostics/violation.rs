//! Violation model

use crate::shared::models::MethodId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Interface-typed parameter or field holds types that do not implement it
    DeclaredTypeMismatch,
    /// Native entry point with internal callers
    EntryPointCalledInternally,
    /// Build-time-only element reachable at run time
    HostedElementLeak,
    /// Construct the type-flow engine or a feature cannot support
    UnsupportedFeature,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeclaredTypeMismatch => "declared-type-mismatch",
            Self::EntryPointCalledInternally => "entry-point-called-internally",
            Self::HostedElementLeak => "hosted-element-leak",
            Self::UnsupportedFeature => "unsupported-feature",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One deferred problem, keyed by the qualified name of the offending element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub key: String,
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodId>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            method: None,
            message: message.into(),
        }
    }

    /// Attach the method the problem was found in
    pub fn in_method(mut self, method: MethodId) -> Self {
        self.method = Some(method);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_matches_json() {
        for kind in [
            ViolationKind::DeclaredTypeMismatch,
            ViolationKind::EntryPointCalledInternally,
            ViolationKind::HostedElementLeak,
            ViolationKind::UnsupportedFeature,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
            assert_eq!(serde_json::from_value::<ViolationKind>(kind.as_str().into()).unwrap(), kind);
        }
    }

    #[test]
    fn test_report_json_uses_kind_name() {
        let violation = Violation::new(ViolationKind::HostedElementLeak, "a.hosted.B", "leak");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["kind"], "hosted-element-leak");
        assert!(json.get("method").is_none());
    }
}
