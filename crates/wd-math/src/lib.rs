//! Workforce Deviance math utilities.

pub mod stats;

pub use stats::*;
