//! Activity deviation: activities occurring in one half of the log and
//! not the other.

use super::{split_cases, DetectorInput};
use std::collections::HashSet;
use wd_common::{ActivityId, CaseId, Finding, PatternKind, RunConfig};

/// Splits the cases into two seeded halves and checks both directions:
/// every record in one half whose activity never occurs in the other half
/// yields one finding. Records are visited in log order, so the report is
/// deterministic for a fixed seed.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let (first, second) = split_cases(input.log, config.split_seed);
    let mut findings = check_direction(input, &first, &second);
    findings.extend(check_direction(input, &second, &first));
    findings
}

fn check_direction(
    input: DetectorInput<'_>,
    reference: &[CaseId],
    probe: &[CaseId],
) -> Vec<Finding> {
    let reference_cases: HashSet<CaseId> = reference.iter().copied().collect();
    let probe_cases: HashSet<CaseId> = probe.iter().copied().collect();

    let known: HashSet<ActivityId> = input
        .log
        .records
        .iter()
        .filter(|r| reference_cases.contains(&r.case))
        .map(|r| r.activity)
        .collect();

    input
        .log
        .records
        .iter()
        .filter(|r| probe_cases.contains(&r.case) && !known.contains(&r.activity))
        .map(|r| {
            Finding::new(
                PatternKind::ActivityDeviation,
                "The activity occurs in this part of the log but never in the rest of it, indicating a possible deviation from the standard process",
            )
            .with_activity(input.log.activity_name(r.activity))
            .with_case(input.log.case_name(r.case))
        })
        .collect()
}
