//! gem5 `stats.txt` ingestion
//!
//! Turns a gem5 text statistics dump into one run entry of the JSON
//! artifact consumed by [`crate::record`]. A dump looks like:
//!
//! ```text
//! ---------- Begin Simulation Statistics ----------
//! simSeconds                                   0.000058                       # Number of seconds simulated (Second)
//! simTicks                                     58467000                       # Number of ticks simulated (Tick)
//! system.cpu.ipc                               0.412731                       # IPC: instructions per cycle ((Count/Cycle))
//! ---------- End Simulation Statistics   ----------
//! ```
//!
//! When a file holds several dumps the later value of a key wins.

use crate::error::{AnalysisError, Result};
use crate::persist;
use serde_json::{Map, Number, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

const DUMP_SEPARATOR: &str = "----------";

/// Default `alias → stats key` selection
pub const DEFAULT_METRICS: [(&str, &str); 6] = [
    ("simulation_seconds", "simSeconds"),
    ("ipc", "system.cpu.ipc"),
    ("cpi", "system.cpu.cpi"),
    ("ticks", "simTicks"),
    ("op_rate", "hostOpRate"),
    ("mem_bus_latency", "system.mem_ctrl.dram.avgBusLat"),
];

/// Which entries of a dump end up in the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSelection {
    /// Every key of the dump, under its own name
    All,
    /// Only the listed stats keys (exact match), stored under their alias
    Named(Vec<(String, String)>),
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::Named(
            DEFAULT_METRICS
                .iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string()))
                .collect(),
        )
    }
}

/// Parse a stats dump into `key → value`, in first-seen key order
///
/// Values are the text before any `#` comment. Integers and floats become
/// JSON numbers; anything else (histogram rows, `nan`) stays a string.
pub fn parse_stats(text: &str) -> Map<String, Value> {
    let mut entries = Map::new();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        if key.starts_with(DUMP_SEPARATOR) || key.starts_with('#') {
            continue;
        }

        let rest = tokens.collect::<Vec<_>>().join(" ");
        let raw = rest.split('#').next().unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }

        entries.insert(key.to_string(), parse_value(raw));
    }

    entries
}

fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(raw.to_string()),
    }
}

/// Apply a selection to a parsed dump
pub fn select(entries: &Map<String, Value>, selection: &MetricSelection) -> Map<String, Value> {
    match selection {
        MetricSelection::All => entries.clone(),
        MetricSelection::Named(pairs) => pairs
            .iter()
            .filter_map(|(alias, key)| entries.get(key).map(|v| (alias.clone(), v.clone())))
            .collect(),
    }
}

/// Run identifier for a simulator script: its file name
pub fn run_id_from_script(script: &Path) -> Option<String> {
    script
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Insert or replace one run in the artifact at `artifact`
///
/// A missing artifact starts out empty. Other runs and their order are
/// kept; replacing a run keeps its position.
pub fn merge_into_artifact(
    artifact: &Path,
    run_id: &str,
    metrics: Map<String, Value>,
) -> Result<()> {
    let mut runs = match fs::read_to_string(artifact) {
        Ok(contents) => match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(runs)) => runs,
            Ok(_) => {
                return Err(AnalysisError::format(
                    "existing artifact is not an object of runs",
                )
                .with_path(artifact))
            }
            Err(e) => {
                return Err(
                    AnalysisError::format(format!("invalid JSON: {}", e)).with_path(artifact)
                )
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
        Err(e) => {
            return Err(AnalysisError::SourceNotFound {
                path: artifact.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    runs.insert(run_id.to_string(), Value::Object(metrics));

    let mut body = serde_json::to_string_pretty(&Value::Object(runs))
        .map_err(|e| AnalysisError::format(e.to_string()))?;
    body.push('\n');

    persist::write_atomic(artifact, body.as_bytes()).map_err(|e| AnalysisError::ArtifactWrite {
        path: artifact.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse `stats_path`, select metrics, and merge them into `artifact`
///
/// Returns the number of metrics stored for the run.
pub fn ingest(
    stats_path: &Path,
    artifact: &Path,
    run_id: &str,
    selection: &MetricSelection,
) -> Result<usize> {
    let text = fs::read_to_string(stats_path).map_err(|e| AnalysisError::SourceNotFound {
        path: stats_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let entries = parse_stats(&text);
    let metrics = select(&entries, selection);
    debug!(
        stats = %stats_path.display(),
        parsed = entries.len(),
        selected = metrics.len(),
        "parsed stats dump"
    );

    if metrics.is_empty() {
        return Err(AnalysisError::format(format!(
            "no selected metrics found in {}",
            stats_path.display()
        )));
    }

    let stored = metrics.len();
    merge_into_artifact(artifact, run_id, metrics)?;
    info!(run_id, artifact = %artifact.display(), metrics = stored, "ingested run");
    Ok(stored)
}
