//! Raw event-log records as produced by the log source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle marker distinguishing a "start" record from a "complete"
/// record for the same logical task instance.
///
/// Markers are matched case-insensitively; anything other than
/// start/complete is carried through as [`Lifecycle::Other`] and ignored
/// by pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Lifecycle {
    Start,
    Complete,
    Other(String),
}

impl Lifecycle {
    pub fn parse(marker: &str) -> Self {
        match marker.to_lowercase().as_str() {
            "start" => Lifecycle::Start,
            "complete" => Lifecycle::Complete,
            _ => Lifecycle::Other(marker.to_string()),
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Lifecycle::Start)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Lifecycle::Complete)
    }
}

impl From<String> for Lifecycle {
    fn from(marker: String) -> Self {
        Lifecycle::parse(&marker)
    }
}

impl From<Lifecycle> for String {
    fn from(lifecycle: Lifecycle) -> Self {
        match lifecycle {
            Lifecycle::Start => "start".to_string(),
            Lifecycle::Complete => "complete".to_string(),
            Lifecycle::Other(marker) => marker,
        }
    }
}

/// One immutable record from the event-log source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Case identifier grouping related events.
    pub case_id: String,

    /// Activity name of the performed task.
    pub activity: String,

    /// Resource (actor) who performed the event.
    pub resource: String,

    /// Absolute event timestamp.
    pub timestamp: DateTime<Utc>,

    /// Start/complete lifecycle marker.
    pub lifecycle: Lifecycle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn lifecycle_parses_case_insensitively() {
        assert_eq!(Lifecycle::parse("Start"), Lifecycle::Start);
        assert_eq!(Lifecycle::parse("COMPLETE"), Lifecycle::Complete);
        assert_eq!(
            Lifecycle::parse("schedule"),
            Lifecycle::Other("schedule".to_string())
        );
    }

    #[test]
    fn raw_record_roundtrips_through_json() {
        let record = RawRecord {
            case_id: "case-1".into(),
            activity: "Approve Request".into(),
            resource: "Alice".into(),
            timestamp: Utc.with_ymd_and_hms(2023, 8, 1, 9, 30, 0).unwrap(),
            lifecycle: Lifecycle::Start,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: RawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(json.contains(r#""lifecycle":"start""#));
    }
}
