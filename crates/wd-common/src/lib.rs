//! Workforce Deviance shared types, identifiers, and errors.
//!
//! This crate provides the vocabulary shared across wd-core modules:
//! - Interned case/resource/activity identifiers
//! - Raw event-log records and lifecycle markers
//! - The Finding record every detector emits
//! - Common error types
//! - Run configuration (detector thresholds, working hours) with validation

pub mod config;
pub mod error;
pub mod finding;
pub mod id;
pub mod record;

pub use config::{MaskingThresholds, RunConfig, WorkingHours};
pub use error::{Error, Result};
pub use finding::{Finding, PatternKind};
pub use id::{ActivityId, CaseId, Interner, ResourceId};
pub use record::{Lifecycle, RawRecord};
