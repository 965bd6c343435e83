//! Social borrowing: one resource speeding up while sharing working
//! hours with a slower colleague.

use super::DetectorInput;
use wd_common::{Finding, PatternKind, ResourceId, RunConfig};
use wd_math::MeanAccumulator;

/// Fires per ordered resource pair (initiator, victim) whose configured
/// working hours overlap. Durations inside the shared window (by record
/// time of day, boundaries inclusive) are compared against durations
/// outside it: the initiator must be faster in the window than
/// `alone * borrowing_speedup_factor`, while the victim is no faster in
/// the window than alone. Pairs where any of the four means is missing
/// are skipped.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for initiator in input.log.resource_ids() {
        for victim in input.log.resource_ids() {
            if initiator == victim {
                continue;
            }
            if let Some(finding) = check_pair(input, config, initiator, victim) {
                findings.push(finding);
            }
        }
    }
    findings
}

fn check_pair(
    input: DetectorInput<'_>,
    config: &RunConfig,
    initiator: ResourceId,
    victim: ResourceId,
) -> Option<Finding> {
    let hours_a = config.hours_for(input.log.resource_name(initiator));
    let hours_b = config.hours_for(input.log.resource_name(victim));
    if hours_a.start > hours_b.end || hours_b.start > hours_a.end {
        return None;
    }
    let overlap_start = hours_a.start.max(hours_b.start);
    let overlap_end = hours_a.end.min(hours_b.end);
    if overlap_start >= overlap_end {
        return None;
    }

    let mut overlap = [MeanAccumulator::default(), MeanAccumulator::default()];
    let mut alone = [MeanAccumulator::default(), MeanAccumulator::default()];
    for record in input.timed {
        let slot = if record.resource == initiator {
            0
        } else if record.resource == victim {
            1
        } else {
            continue;
        };
        let Some(duration) = record.duration else {
            continue;
        };
        let tod = record.timestamp.time();
        if tod >= overlap_start && tod <= overlap_end {
            overlap[slot].add(duration);
        } else {
            alone[slot].add(duration);
        }
    }

    let initiator_overlap = overlap[0].mean()?;
    let initiator_alone = alone[0].mean()?;
    let victim_overlap = overlap[1].mean()?;
    let victim_alone = alone[1].mean()?;

    let speedup = initiator_overlap < initiator_alone * config.borrowing_speedup_factor;
    let victim_unhelped = victim_overlap >= victim_alone;
    if speedup && victim_unhelped {
        Some(
            Finding::new(
                PatternKind::SocialBorrowing,
                "The first listed resource performs significantly faster while sharing working hours with the second, who gains nothing from the shared window",
            )
            .with_resource(input.log.resource_name(initiator))
            .with_resource(input.log.resource_name(victim))
            .with_metric("initiator_overlap_secs", initiator_overlap)
            .with_metric("initiator_alone_secs", initiator_alone)
            .with_metric("victim_overlap_secs", victim_overlap)
            .with_metric("victim_alone_secs", victim_alone),
        )
    } else {
        None
    }
}
