//! Domain-specific assertions

use imagegraph_universe::features::analysis_universe::UniverseCounts;
use imagegraph_universe::features::diagnostics::{Violation, ViolationKind};
use imagegraph_universe::features::fixpoint::AnalysisStatistics;
use imagegraph_universe::features::hosted_universe::HostedUniverse;

/// Exactly one violation of `kind`, keyed by `key`, whose message contains `fragment`
pub fn assert_single_violation(violations: &[Violation], kind: ViolationKind, key: &str, fragment: &str) {
    let matching: Vec<&Violation> = violations.iter().filter(|v| v.kind == kind).collect();
    assert_eq!(
        matching.len(),
        1,
        "Expected one {kind} violation, got: {:?}",
        matching
    );
    assert_eq!(matching[0].key, key);
    assert!(
        matching[0].message.contains(fragment),
        "Expected '{fragment}' in: {}",
        matching[0].message
    );
}

pub fn assert_no_violation_of(violations: &[Violation], kind: ViolationKind) {
    assert!(
        violations.iter().all(|v| v.kind != kind),
        "Unexpected {kind} violations: {:?}",
        violations
    );
}

/// Element counts never shrink, within or across iterations
pub fn assert_monotonic_counts(statistics: &AnalysisStatistics) {
    let mut previous: Option<UniverseCounts> = None;
    for record in &statistics.iteration_log {
        let (before, after) = (record.counts_before, record.counts_after);
        assert!(
            after.types >= before.types && after.methods >= before.methods && after.fields >= before.fields,
            "Universe shrank in iteration {}: {} -> {}",
            record.iteration,
            before,
            after
        );
        if let Some(prev) = previous {
            assert!(
                before.types >= prev.types && before.methods >= prev.methods && before.fields >= prev.fields,
                "Universe shrank between iterations: {} -> {}",
                prev,
                before
            );
        }
        previous = Some(after);
    }
}

/// Every hosted element maps back to the analysis id it was built from
pub fn assert_identity_round_trip(hosted: &HostedUniverse) {
    for ty in hosted.types() {
        assert_eq!(hosted.lookup_type(ty.analysis_id()), Some(ty.id()), "type {}", ty.name());
    }
    for method in hosted.methods() {
        assert_eq!(
            hosted.lookup_method(method.analysis_id()),
            Some(method.id()),
            "method {}",
            method.qualified_name()
        );
    }
    for field in hosted.fields() {
        assert_eq!(
            hosted.lookup_field(field.analysis_id()),
            Some(field.id()),
            "field {}",
            field.qualified_name()
        );
    }
}
