//! Text and JSON rendering of classified runs
//!
//! Rendering is pure: every function here returns a `String` and the
//! caller decides where it goes (stdout for the CLI, the plot annotation
//! for the aggregate block).

use crate::baseline::Baseline;
use crate::classify::{Classification, ClassificationMap, Label};
use crate::record::{MetricFields, RecordSet};
use serde::Serialize;
use std::fmt::Write as _;

const SEPARATOR: &str = "----------------------------------------";

/// Human-readable names for the two metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLabels {
    pub throughput: String,
    pub duration: String,
}

impl MetricLabels {
    pub fn new(throughput: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            throughput: throughput.into(),
            duration: duration.into(),
        }
    }

    /// Derive labels from field names, recognizing common gem5 counters
    pub fn from_fields(fields: &MetricFields) -> Self {
        Self {
            throughput: display_name(&fields.throughput),
            duration: display_name(&fields.duration),
        }
    }
}

impl Default for MetricLabels {
    fn default() -> Self {
        Self::from_fields(&MetricFields::default())
    }
}

fn display_name(field: &str) -> String {
    match field {
        "ipc" | "system.cpu.ipc" => "IPC",
        "cpi" | "system.cpu.cpi" => "CPI",
        "ticks" | "simTicks" => "Ticks",
        "simSeconds" | "simulation_seconds" => "Sim Seconds",
        "op_rate" | "hostOpRate" => "Op Rate",
        other => other,
    }
    .to_string()
}

/// Compact number formatting for summaries and plot captions
///
/// Whole numbers print without decimals (tick counts), everything else
/// keeps enough digits to stay distinguishable.
pub fn compact(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else if value.abs() >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.4}", value)
    }
}

/// Per-run console report
///
/// One block per run, in record-set order:
///
/// ```text
/// 📊 r1 performance analysis:
/// - Mean IPC: 2, Mean Ticks: 600
/// - IPC: 1, Ticks: 1000
///   🐌 High Ticks & low IPC -> possible memory bottleneck
/// ----------------------------------------
/// ```
pub fn render(
    records: &RecordSet,
    baseline: &Baseline,
    classifications: &ClassificationMap,
    labels: &MetricLabels,
) -> String {
    let mut out = String::new();

    for record in records {
        let _ = writeln!(out, "📊 {} performance analysis:", record.run_id);
        let _ = writeln!(
            out,
            "- Mean {}: {}, Mean {}: {}",
            labels.throughput, baseline.mean_throughput, labels.duration, baseline.mean_duration
        );
        let _ = writeln!(
            out,
            "- {}: {}, {}: {}",
            labels.throughput, record.throughput, labels.duration, record.duration
        );

        for label in classifications.get(&record.run_id).labels() {
            let _ = writeln!(out, "  {}", label_line(label, labels));
        }

        let _ = writeln!(out, "{}", SEPARATOR);
    }

    out
}

fn label_line(label: Label, labels: &MetricLabels) -> String {
    match label {
        Label::BottleneckSuspect => format!(
            "🐌 High {} & low {} -> possible memory bottleneck",
            labels.duration, labels.throughput
        ),
        Label::OptimalCandidate => format!(
            "⚡ Low {} & high {} -> optimal configuration found",
            labels.duration, labels.throughput
        ),
    }
}

/// Aggregate summary block
///
/// Used as the in-plot annotation of the annotated scatter variant and by
/// `analyze --summary`.
pub fn render_aggregate(
    baseline: &Baseline,
    classifications: &ClassificationMap,
    labels: &MetricLabels,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Baseline over {} run(s)", baseline.count);
    let _ = writeln!(
        out,
        "Mean {}: {} (min {}, max {})",
        labels.throughput,
        compact(baseline.mean_throughput),
        compact(baseline.min_throughput),
        compact(baseline.max_throughput)
    );
    let _ = writeln!(
        out,
        "Mean {}: {} (min {}, max {})",
        labels.duration,
        compact(baseline.mean_duration),
        compact(baseline.min_duration),
        compact(baseline.max_duration)
    );

    for label in Label::ALL {
        let runs: Vec<&str> = classifications.runs_with(label).collect();
        let heading = match label {
            Label::BottleneckSuspect => "Memory bottleneck suspected",
            Label::OptimalCandidate => "Optimal combination found",
        };
        if runs.is_empty() {
            let _ = writeln!(out, "{}: no", heading);
        } else {
            let _ = writeln!(out, "{}: yes ({})", heading, runs.join(", "));
        }
    }

    out
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    throughput_field: &'a str,
    duration_field: &'a str,
    baseline: &'a Baseline,
    runs: Vec<JsonRun<'a>>,
    bottleneck_suspects: Vec<&'a str>,
    optimal_candidates: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonRun<'a> {
    run_id: &'a str,
    throughput: f64,
    duration: f64,
    labels: Classification,
}

/// Machine-readable report
pub fn render_json(
    records: &RecordSet,
    baseline: &Baseline,
    classifications: &ClassificationMap,
) -> serde_json::Result<String> {
    let runs = records
        .iter()
        .map(|r| JsonRun {
            run_id: &r.run_id,
            throughput: r.throughput,
            duration: r.duration,
            labels: classifications.get(&r.run_id),
        })
        .collect();

    let report = JsonReport {
        throughput_field: &records.fields().throughput,
        duration_field: &records.fields().duration,
        baseline,
        runs,
        bottleneck_suspects: classifications.runs_with(Label::BottleneckSuspect).collect(),
        optimal_candidates: classifications.runs_with(Label::OptimalCandidate).collect(),
    };

    serde_json::to_string_pretty(&report)
}
