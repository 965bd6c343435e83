//! Findings report: one JSON finding per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use wd_common::{Finding, Result};

/// Write the findings as JSONL to any writer.
pub fn write_findings<W: Write>(mut writer: W, findings: &[Finding]) -> Result<()> {
    for finding in findings {
        serde_json::to_writer(&mut writer, finding)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the findings report to a file.
pub fn write_report(path: &Path, findings: &[Finding]) -> Result<()> {
    let file = File::create(path)?;
    write_findings(BufWriter::new(file), findings)?;
    info!(findings = findings.len(), path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wd_common::PatternKind;

    #[test]
    fn findings_serialize_one_per_line() {
        let findings = vec![
            Finding::new(PatternKind::SocialLoafing, "slower in groups")
                .with_resource("Alice")
                .with_metric("avg_group_secs", 700.0),
            Finding::new(PatternKind::Reordering, "order matches no other case").with_case("c9"),
        ];
        let mut buf = Vec::new();
        write_findings(&mut buf, &findings).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["pattern"], "social_loafing");
        assert_eq!(first["resources"][0], "Alice");
        assert_eq!(first["metrics"]["avg_group_secs"], 700.0);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["pattern"], "reordering");
        // Empty collections are omitted from the wire format.
        assert!(second.get("resources").is_none());
    }

    #[test]
    fn report_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("findings.jsonl");
        let findings =
            vec![Finding::new(PatternKind::OverworkHiding, "early work").with_resource("Bob")];
        write_report(&path, &findings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Finding = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed.pattern, PatternKind::OverworkHiding);
        assert_eq!(parsed.resources, vec!["Bob".to_string()]);
    }
}
