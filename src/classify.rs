//! Two-metric bottleneck / optimal classification
//!
//! A run is compared against the population means on both axes:
//!
//! | duration vs mean | throughput vs mean | label |
//! |------------------|--------------------|-------|
//! | above            | below              | [`Label::BottleneckSuspect`] |
//! | below            | above              | [`Label::OptimalCandidate`] |
//!
//! Comparisons are strict. A run sitting exactly on either mean gets no
//! label on that axis, so ties are nominal rather than anomalous.

use crate::baseline::Baseline;
use crate::record::{RecordSet, StatRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Anomaly label attached to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Above-average cost with below-average throughput (likely memory-bound)
    BottleneckSuspect,
    /// Below-average cost with above-average throughput
    OptimalCandidate,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::BottleneckSuspect, Label::OptimalCandidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::BottleneckSuspect => "BOTTLENECK_SUSPECT",
            Label::OptimalCandidate => "OPTIMAL_CANDIDATE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of labels for one run (possibly empty)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Classification {
    bottleneck_suspect: bool,
    optimal_candidate: bool,
}

impl Classification {
    pub fn contains(&self, label: Label) -> bool {
        match label {
            Label::BottleneckSuspect => self.bottleneck_suspect,
            Label::OptimalCandidate => self.optimal_candidate,
        }
    }

    /// True when no label applies
    pub fn is_nominal(&self) -> bool {
        !self.bottleneck_suspect && !self.optimal_candidate
    }

    /// Labels present, in [`Label::ALL`] order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        Label::ALL.into_iter().filter(|l| self.contains(*l))
    }

    pub fn with(mut self, label: Label) -> Self {
        match label {
            Label::BottleneckSuspect => self.bottleneck_suspect = true,
            Label::OptimalCandidate => self.optimal_candidate = true,
        }
        self
    }
}

impl Serialize for Classification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.labels())
    }
}

/// Classify one run against a baseline
pub fn classify(record: &StatRecord, baseline: &Baseline) -> Classification {
    let mut class = Classification::default();

    if record.duration > baseline.mean_duration && record.throughput < baseline.mean_throughput {
        class = class.with(Label::BottleneckSuspect);
    }
    if record.duration < baseline.mean_duration && record.throughput > baseline.mean_throughput {
        class = class.with(Label::OptimalCandidate);
    }

    class
}

/// Classification of every run in a record set, keyed by run id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationMap {
    by_run: BTreeMap<String, Classification>,
}

impl ClassificationMap {
    /// Classification of a run; unknown run ids read as nominal
    pub fn get(&self, run_id: &str) -> Classification {
        self.by_run.get(run_id).copied().unwrap_or_default()
    }

    /// Run ids carrying `label`, in run-id order
    pub fn runs_with(&self, label: Label) -> impl Iterator<Item = &str> + '_ {
        self.by_run
            .iter()
            .filter(move |(_, c)| c.contains(label))
            .map(|(id, _)| id.as_str())
    }

    /// Whether any run carries `label`
    pub fn any(&self, label: Label) -> bool {
        self.by_run.values().any(|c| c.contains(label))
    }

    pub fn len(&self) -> usize {
        self.by_run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_run.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Classification)> + '_ {
        self.by_run.iter().map(|(id, c)| (id.as_str(), *c))
    }
}

/// Classify every run in a record set
pub fn classify_all(records: &RecordSet, baseline: &Baseline) -> ClassificationMap {
    let by_run = records
        .iter()
        .map(|r| (r.run_id.clone(), classify(r, baseline)))
        .collect();
    ClassificationMap { by_run }
}
