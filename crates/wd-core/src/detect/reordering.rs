//! Re-ordering: cases executing activities in an order never seen in the
//! rest of the log.

use super::{split_cases, DetectorInput};
use crate::normalize::EventLog;
use wd_common::{CaseId, Finding, PatternKind, RunConfig};

/// Splits the cases into two seeded halves and checks both directions. A
/// probe case matches a reference case when their position-tagged
/// activity sequences agree over the shorter of the two; a probe case
/// matching no reference case at all is reported once.
///
/// Mismatch positions in the report are measured against the last
/// reference sequence examined, which for an unmatched case is the last
/// one in the reference half.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let (first, second) = split_cases(input.log, config.split_seed);
    let mut findings = check_direction(input.log, &first, &second);
    findings.extend(check_direction(input.log, &second, &first));
    findings
}

fn check_direction(log: &EventLog, reference: &[CaseId], probe: &[CaseId]) -> Vec<Finding> {
    let reference_seqs: Vec<Vec<String>> =
        reference.iter().map(|&c| case_sequence(log, c)).collect();

    let mut findings = Vec::new();
    for &case in probe {
        let sequence = case_sequence(log, case);
        let matched = reference_seqs
            .iter()
            .any(|reference_seq| sequences_match(&sequence, reference_seq));
        if matched {
            continue;
        }

        let mismatches = reference_seqs
            .last()
            .map(|last| mismatch_positions(&sequence, last))
            .unwrap_or_default();
        let mut finding = Finding::new(
            PatternKind::Reordering,
            "The case executes its activities in an order that matches no other case in the rest of the log",
        )
        .with_case(log.case_name(case))
        .with_metric("mismatch_count", mismatches.len() as f64);
        if let Some(&first) = mismatches.first() {
            finding = finding.with_metric("first_mismatch_position", first as f64);
        }
        findings.push(finding);
    }
    findings
}

/// The case's position-tagged activity sequence: the n-th record in
/// timestamp order becomes `"{n}.{activity}"`, lowercased and trimmed.
fn case_sequence(log: &EventLog, case: CaseId) -> Vec<String> {
    let mut indices: Vec<usize> = (0..log.records.len())
        .filter(|&i| log.records[i].case == case)
        .collect();
    indices.sort_by_key(|&i| log.records[i].timestamp);
    indices
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            let name = log.activity_name(log.records[i].activity);
            format!("{}.{}", pos + 1, name.trim().to_lowercase())
        })
        .collect()
}

/// Agreement over the shorter sequence counts as a match; a strict
/// prefix of a longer reference is not a re-ordering.
fn sequences_match(a: &[String], b: &[String]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}

/// One-based positions where the two sequences disagree, over the
/// shorter of the two.
fn mismatch_positions(a: &[String], b: &[String]) -> Vec<usize> {
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::tests_support::raw;
    use crate::normalize::{pair_events, timed_records, EventLog};
    use crate::stats::AggregateTables;
    use wd_common::Lifecycle;

    fn case_with(case: &str, activities: &[&str], base: i64) -> Vec<wd_common::RawRecord> {
        activities
            .iter()
            .enumerate()
            .map(|(i, activity)| {
                raw(case, activity, "Alice", base + i as i64 * 100, Lifecycle::Complete)
            })
            .collect()
    }

    fn run(records: Vec<wd_common::RawRecord>, seed: u64) -> Vec<Finding> {
        let log = EventLog::from_records(&records);
        let paired = pair_events(&log);
        let flags = vec![false; paired.len()];
        let timed = timed_records(&log);
        let tables = AggregateTables::build(&log, &timed);
        let config = RunConfig {
            split_seed: seed,
            ..RunConfig::default()
        };
        detect(
            DetectorInput {
                log: &log,
                paired: &paired,
                flags: &flags,
                timed: &timed,
                tables: &tables,
            },
            &config,
        )
    }

    #[test]
    fn identical_orders_produce_no_findings() {
        let mut records = Vec::new();
        for i in 0..8 {
            records.extend(case_with(
                &format!("c{i}"),
                &["Receive", "Review", "Approve"],
                i * 10_000,
            ));
        }
        assert!(run(records, 0).is_empty());
    }

    #[test]
    fn swapped_activities_in_one_case_are_reported() {
        let mut records = Vec::new();
        for i in 0..8 {
            records.extend(case_with(
                &format!("c{i}"),
                &["Receive", "Review", "Approve"],
                i * 10_000,
            ));
        }
        records.extend(case_with("odd", &["Receive", "Approve", "Review"], 900_000));

        let findings = run(records, 1);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].cases, vec!["odd".to_string()]);
        // Positions 2 and 3 disagree with the standard order.
        assert_eq!(findings[0].metrics["mismatch_count"], 2.0);
        assert_eq!(findings[0].metrics["first_mismatch_position"], 2.0);
    }

    #[test]
    fn comparison_ignores_case_and_whitespace() {
        let mut records = Vec::new();
        for i in 0..4 {
            records.extend(case_with(&format!("c{i}"), &["Review", "Approve"], i * 10_000));
        }
        records.extend(case_with("odd", &[" REVIEW ", "approve"], 900_000));
        assert!(run(records, 0).is_empty());
    }

    #[test]
    fn shorter_case_matching_a_prefix_is_not_reported() {
        let mut records = Vec::new();
        for i in 0..6 {
            records.extend(case_with(
                &format!("c{i}"),
                &["Receive", "Review", "Approve"],
                i * 10_000,
            ));
        }
        records.extend(case_with("short", &["Receive", "Review"], 900_000));
        assert!(run(records, 2).is_empty());
    }
}
