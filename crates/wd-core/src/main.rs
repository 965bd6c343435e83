//! Workforce deviance miner - event-log analysis entry point.

use clap::Parser;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info};
use wd_common::{Result, RunConfig};
use wd_core::detect::{run_all_detectors, DetectorInput};
use wd_core::groupwork::classify_group_work;
use wd_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use wd_core::normalize::{pair_events, timed_records, EventLog};
use wd_core::stats::AggregateTables;
use wd_core::{ingest, report};

/// Detect workforce deviance patterns in a business-process event log
#[derive(Parser, Debug)]
#[command(name = "wd-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Event log to analyze (JSONL, one record per line)
    log: PathBuf,

    /// Detector configuration (JSON); defaults apply when omitted
    #[arg(short, long, env = "WD_CONFIG")]
    config: Option<PathBuf>,

    /// Write the findings report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for the split-based detectors, overriding the config file
    #[arg(long)]
    split_seed: Option<u64>,

    /// Minimum log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        format: cli.log_format,
        level: cli.log_level,
    });

    if let Err(err) = run(&cli) {
        error!(code = err.code(), category = %err.category(), "{err}");
        std::process::exit(err.code() as i32);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    if let Some(seed) = cli.split_seed {
        config.split_seed = seed;
    }

    let records = ingest::read_records(&cli.log)?;
    let log = EventLog::from_records(&records);
    info!(
        cases = log.num_cases(),
        resources = log.num_resources(),
        activities = log.num_activities(),
        "event log normalized"
    );

    let paired = pair_events(&log);
    let flags = classify_group_work(&paired);
    let timed = timed_records(&log);
    let tables = AggregateTables::build(&log, &timed);
    info!(
        paired = paired.len(),
        group_events = flags.iter().filter(|&&f| f).count(),
        "group-work classification finished"
    );

    let findings = run_all_detectors(
        DetectorInput {
            log: &log,
            paired: &paired,
            flags: &flags,
            timed: &timed,
            tables: &tables,
        },
        &config,
    );
    info!(findings = findings.len(), "detector suite finished");

    match &cli.output {
        Some(path) => report::write_report(path, &findings)?,
        None => report::write_findings(BufWriter::new(std::io::stdout().lock()), &findings)?,
    }
    Ok(())
}
