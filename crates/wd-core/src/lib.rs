//! Workforce Deviance Core - collaborative-work classification and
//! deviance-detection engine.
//!
//! The engine runs one synchronous batch pass over an in-memory event
//! log:
//!
//! 1. [`normalize`] indexes raw records into an arena of interned ids and
//!    derives the two normalized views: paired start/complete events and
//!    per-record durations.
//! 2. [`groupwork`] labels each paired event as group work or individual
//!    work using four structural heuristics, case by case.
//! 3. [`stats`] snapshots the aggregate frequency and duration tables all
//!    deviance detectors score against.
//! 4. [`detect`] runs the detector suite; each detector is a pure
//!    function from the immutable inputs to a list of findings.
//!
//! Detectors never mutate events and may run in any order. Sparse or
//! partial logs suppress findings instead of failing; the only error
//! paths live at the ingest/report boundaries.

pub mod detect;
pub mod groupwork;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod stats;

pub use detect::{run_all_detectors, DetectorInput};
pub use groupwork::classify_group_work;
pub use normalize::{pair_events, timed_records, EventLog, PairedEvent, TimedRecord};
pub use stats::AggregateTables;
