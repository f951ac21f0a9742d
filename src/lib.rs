//! simlens - baseline-driven analysis of gem5 simulation statistics
//!
//! This library loads per-run simulator statistics, computes population
//! baselines for a throughput metric (IPC) and a duration metric (ticks or
//! simulated seconds), flags runs that look memory-bound or optimal, and
//! renders the result as a text/JSON report and an SVG scatter plot.

pub mod analysis;
pub mod baseline;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod gem5_stats;
mod persist;
pub mod record;
pub mod report;
pub mod scatter;

pub use error::{AnalysisError, Result};
