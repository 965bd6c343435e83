//! Event-log ingest: one JSON record per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;
use wd_common::{Error, RawRecord, Result};

/// Read a JSONL event log from disk. Blank lines are skipped; a parse
/// failure names the 1-based line it occurred on, and a log without a
/// single record is rejected.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)?;
    let records = read_records_from(BufReader::new(file))?;
    if records.is_empty() {
        return Err(Error::EmptyLog(path.display().to_string()));
    }
    info!(records = records.len(), path = %path.display(), "event log loaded");
    Ok(records)
}

/// Read JSONL records from any buffered reader.
pub fn read_records_from<R: BufRead>(reader: R) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: RawRecord =
            serde_json::from_str(trimmed).map_err(|e| Error::MalformedRecord {
                line: idx + 1,
                message: e.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}
