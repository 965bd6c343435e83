//! Overwork hiding: events recorded outside the resource's working
//! hours.

use super::DetectorInput;
use chrono::Timelike;
use wd_common::{Finding, PatternKind, RunConfig};

/// Fires per record whose time of day falls strictly outside the
/// resource's configured working window, with a separate explanation for
/// before-hours and after-hours work. Records exactly on a boundary are
/// inside the window.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for record in input.timed {
        let hours = config.hours_for(input.log.resource_name(record.resource));
        let tod = record.timestamp.time();

        let explanation = if tod < hours.start {
            "The resource performs work before the start of its working hours, possibly hiding overwork"
        } else if tod > hours.end {
            "The resource performs work after the end of its working hours, possibly hiding overwork"
        } else {
            continue;
        };

        findings.push(
            Finding::new(PatternKind::OverworkHiding, explanation)
                .with_resource(input.log.resource_name(record.resource))
                .with_activity(input.log.activity_name(record.activity))
                .with_case(input.log.case_name(record.case))
                .with_metric("time_of_day_secs", tod.num_seconds_from_midnight() as f64),
        );
    }
    findings
}
