//! Single-artifact analysis pass
//!
//! Load → baseline → classify runs once; the report and plot are then
//! rendered from the same immutable state. Each artifact gets its own
//! `Analysis`, nothing is shared between passes.

use crate::baseline::Baseline;
use crate::classify::{classify_all, ClassificationMap, Label};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::record::RecordSet;
use crate::report::{self, MetricLabels};
use crate::scatter::{self, ScatterOptions};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Analysis {
    records: RecordSet,
    baseline: Baseline,
    classifications: ClassificationMap,
}

impl Analysis {
    /// Load an artifact and analyze it with the given configuration
    pub fn load<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<Self> {
        let records = RecordSet::load(path, &config.load_options())?;
        Self::from_records(records)
    }

    /// Analyze an already-loaded record set
    pub fn from_records(records: RecordSet) -> Result<Self> {
        let baseline = Baseline::compute(&records)?;
        let classifications = classify_all(&records, &baseline);

        info!(
            runs = records.len(),
            bottleneck_suspects = classifications.runs_with(Label::BottleneckSuspect).count(),
            optimal_candidates = classifications.runs_with(Label::OptimalCandidate).count(),
            "classified runs"
        );

        Ok(Self {
            records,
            baseline,
            classifications,
        })
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn classifications(&self) -> &ClassificationMap {
        &self.classifications
    }

    pub fn report_text(&self, labels: &MetricLabels) -> String {
        report::render(&self.records, &self.baseline, &self.classifications, labels)
    }

    pub fn aggregate_text(&self, labels: &MetricLabels) -> String {
        report::render_aggregate(&self.baseline, &self.classifications, labels)
    }

    pub fn report_json(&self) -> serde_json::Result<String> {
        report::render_json(&self.records, &self.baseline, &self.classifications)
    }

    pub fn render_plot(&self, options: &ScatterOptions, output_target: &Path) -> Result<()> {
        scatter::render_plot(
            &self.records,
            &self.baseline,
            &self.classifications,
            options,
            output_target,
        )
    }
}
