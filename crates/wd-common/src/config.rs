//! Run configuration: detector thresholds and working-hours windows.
//!
//! Thresholds are either absolute (seconds) or relative (a factor applied
//! to a computed baseline such as an average); which one each field is,
//! is part of the detector's arithmetic contract and documented on the
//! field. All fields have defaults, so a partial JSON config is valid.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A daily working-time window for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for WorkingHours {
    /// The 09:00-17:00 window assumed for any resource without an
    /// explicit override.
    fn default() -> Self {
        WorkingHours {
            start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        }
    }
}

/// Thresholds for the performance-masking detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingThresholds {
    /// Relative: a case is oversized when its event count exceeds the
    /// average case size times this factor.
    pub case_size_factor: f64,
    /// Relative: an activity recurs suspiciously when its count within
    /// the case exceeds its average per-case count times this factor.
    pub recurrence_factor: f64,
    /// Absolute seconds: an event hides in the noise when its own
    /// duration is below this bound.
    pub max_duration_secs: f64,
}

impl Default for MaskingThresholds {
    fn default() -> Self {
        MaskingThresholds {
            case_size_factor: 1.5,
            recurrence_factor: 1.5,
            max_duration_secs: 60.0,
        }
    }
}

/// Full configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Absolute seconds: social loafing fires when a resource's mean
    /// group-work duration exceeds its mean individual-work duration by
    /// more than this.
    pub loafing_threshold_secs: f64,

    /// Relative: an initiator's frequency deviation must exceed the
    /// victim's by more than `avg_freq * this` to count toward peer
    /// mobbing.
    pub peer_deviation_factor: f64,

    /// Relative: peer mobbing fires when the initiator count exceeds
    /// `num_resources * this`.
    pub peer_group_factor: f64,

    /// The boss-takeover cutoff timestamp. Boss mobbing is skipped
    /// entirely when unset.
    pub boss_takeover: Option<DateTime<Utc>>,

    /// Relative: boss mobbing fires per resource when its mean group-work
    /// duration after the takeover exceeds the before-mean by more than
    /// `before * this`.
    pub boss_slowdown_factor: f64,

    /// Relative: social borrowing fires when the initiator's overlap-mean
    /// falls below `alone-mean * this` while the victim's does not drop.
    pub borrowing_speedup_factor: f64,

    /// Performance-masking thresholds.
    pub masking: MaskingThresholds,

    /// Relative: preferential work selection fires when a resource's
    /// frequency deviates from the average by more than
    /// `num_resources * this` (over-selection only).
    pub preferential_deviation_factor: f64,

    /// Absolute seconds: performance blow-out fires when a repeated
    /// activity takes this much longer than its previous occurrence.
    pub blowout_increase_secs: f64,

    /// Absolute seconds: performance blow-out fires when the standard
    /// deviation of per-resource mean durations exceeds this.
    pub blowout_spread_secs: f64,

    /// Absolute seconds: idling (resource) fires when a resource's mean
    /// duration for an activity exceeds the global mean by more than this.
    pub idling_resource_secs: f64,

    /// Absolute seconds: idling (activity) fires when a resource's mean
    /// duration for an activity exceeds its own cross-activity mean by
    /// more than this.
    pub idling_activity_secs: f64,

    /// Absolute seconds: idling (break) fires on a same-day gap between a
    /// complete and the next start longer than this.
    pub idling_break_secs: f64,

    /// Relative: gold plating (duration) fires when a variant's mean
    /// duration exceeds `global_mean * (1 + this)`.
    pub gold_duration_factor: f64,

    /// Fraction of the whole log below which an activity counts as rare
    /// for gold plating (rarity).
    pub gold_rarity_fraction: f64,

    /// Seed for the random case splits of the activity-deviation and
    /// re-ordering detectors. Explicit so runs are reproducible.
    pub split_seed: u64,

    /// Working hours assumed for resources without an override.
    pub default_hours: WorkingHours,

    /// Per-resource working-hours overrides.
    pub working_hours: BTreeMap<String, WorkingHours>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            loafing_threshold_secs: 600.0,
            peer_deviation_factor: 1.0,
            peer_group_factor: 0.4,
            boss_takeover: None,
            boss_slowdown_factor: 0.4,
            borrowing_speedup_factor: 0.5,
            masking: MaskingThresholds::default(),
            preferential_deviation_factor: 0.5,
            blowout_increase_secs: 600.0,
            blowout_spread_secs: 1800.0,
            idling_resource_secs: 300.0,
            idling_activity_secs: 600.0,
            idling_break_secs: 14400.0,
            gold_duration_factor: 0.4,
            gold_rarity_fraction: 0.04,
            split_seed: 0,
            default_hours: WorkingHours::default(),
            working_hours: BTreeMap::new(),
        }
    }
}

impl RunConfig {
    /// Parse a run configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Working hours for a resource, falling back to the default window.
    pub fn hours_for(&self, resource: &str) -> WorkingHours {
        self.working_hours
            .get(resource)
            .copied()
            .unwrap_or(self.default_hours)
    }

    /// Semantic validation of thresholds and windows.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("loafing_threshold_secs", self.loafing_threshold_secs),
            ("peer_deviation_factor", self.peer_deviation_factor),
            ("peer_group_factor", self.peer_group_factor),
            ("boss_slowdown_factor", self.boss_slowdown_factor),
            ("borrowing_speedup_factor", self.borrowing_speedup_factor),
            ("masking.case_size_factor", self.masking.case_size_factor),
            ("masking.recurrence_factor", self.masking.recurrence_factor),
            ("masking.max_duration_secs", self.masking.max_duration_secs),
            (
                "preferential_deviation_factor",
                self.preferential_deviation_factor,
            ),
            ("blowout_increase_secs", self.blowout_increase_secs),
            ("blowout_spread_secs", self.blowout_spread_secs),
            ("idling_resource_secs", self.idling_resource_secs),
            ("idling_activity_secs", self.idling_activity_secs),
            ("idling_break_secs", self.idling_break_secs),
            ("gold_duration_factor", self.gold_duration_factor),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be a non-negative finite number, got {}", value),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.gold_rarity_fraction) {
            return Err(Error::InvalidValue {
                field: "gold_rarity_fraction".to_string(),
                message: format!("must be in [0, 1], got {}", self.gold_rarity_fraction),
            });
        }

        self.check_window("default_hours", &self.default_hours)?;
        for (resource, hours) in &self.working_hours {
            self.check_window(&format!("working_hours.{}", resource), hours)?;
        }

        Ok(())
    }

    fn check_window(&self, field: &str, hours: &WorkingHours) -> Result<()> {
        if hours.start >= hours.end {
            return Err(Error::InvalidValue {
                field: field.to_string(),
                message: format!(
                    "window start {} must precede end {} (overnight windows unsupported)",
                    hours.start, hours.end
                ),
            });
        }
        Ok(())
    }
}
