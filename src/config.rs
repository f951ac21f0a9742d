//! Analysis configuration (`simlens.toml`)
//!
//! Every section is optional; missing keys fall back to the defaults below.
//!
//! ```toml
//! mode = "lenient"            # or "strict" (default)
//!
//! [fields]
//! throughput = "system.cpu.ipc"
//! duration = "simSeconds"
//!
//! [labels]
//! throughput = "IPC"
//! duration = "Seconds"
//!
//! [plot]
//! width = 1200
//! height = 700
//! title = "L2 size sweep"
//! annotate = true
//!
//! [ingest.metrics]
//! ipc = "system.cpu.ipc"
//! ticks = "simTicks"
//! ```

use crate::error::{AnalysisError, Result};
use crate::gem5_stats::{MetricSelection, DEFAULT_METRICS};
use crate::record::{LoadMode, LoadOptions, MetricFields};
use crate::report::MetricLabels;
use crate::scatter::ScatterOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of `simlens.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Handling of absent throughput/duration fields
    pub mode: LoadMode,
    pub fields: MetricFields,
    pub labels: LabelConfig,
    pub plot: PlotConfig,
    pub ingest: IngestConfig,
}

/// Optional display names; unset names are derived from the field names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub throughput: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub annotate: bool,
    /// Default plot path for `analyze` when `--plot` is not given
    pub output: Option<PathBuf>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: None,
            annotate: false,
            output: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// `alias → stats key`; ignored when `all_metrics` is set
    pub metrics: BTreeMap<String, String>,
    /// Keep every key of the dump
    pub all_metrics: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            metrics: DEFAULT_METRICS
                .iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string()))
                .collect(),
            all_metrics: false,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AnalysisError::Config(msg) => {
                AnalysisError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fields.throughput.trim().is_empty() {
            return Err(AnalysisError::Config(
                "fields.throughput must not be empty".to_string(),
            ));
        }
        if self.fields.duration.trim().is_empty() {
            return Err(AnalysisError::Config(
                "fields.duration must not be empty".to_string(),
            ));
        }
        if self.fields.throughput == self.fields.duration {
            return Err(AnalysisError::Config(format!(
                "fields.throughput and fields.duration must differ, both are '{}'",
                self.fields.throughput
            )));
        }
        if self.plot.width < 200 || self.plot.height < 150 {
            return Err(AnalysisError::Config(format!(
                "plot size must be at least 200x150, got {}x{}",
                self.plot.width, self.plot.height
            )));
        }
        if !self.ingest.all_metrics && self.ingest.metrics.is_empty() {
            return Err(AnalysisError::Config(
                "ingest.metrics must name at least one metric unless all_metrics is set"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            fields: self.fields.clone(),
            mode: self.mode,
        }
    }

    /// Display labels, falling back to names derived from the fields
    pub fn metric_labels(&self) -> MetricLabels {
        let derived = MetricLabels::from_fields(&self.fields);
        MetricLabels {
            throughput: self.labels.throughput.clone().unwrap_or(derived.throughput),
            duration: self.labels.duration.clone().unwrap_or(derived.duration),
        }
    }

    pub fn scatter_options(&self) -> ScatterOptions {
        ScatterOptions {
            width: self.plot.width,
            height: self.plot.height,
            title: self.plot.title.clone(),
            labels: self.metric_labels(),
            annotate: self.plot.annotate,
        }
    }

    pub fn metric_selection(&self) -> MetricSelection {
        if self.ingest.all_metrics {
            MetricSelection::All
        } else {
            MetricSelection::Named(
                self.ingest
                    .metrics
                    .iter()
                    .map(|(alias, key)| (alias.clone(), key.clone()))
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.mode, LoadMode::Strict);
        assert_eq!(config.fields, MetricFields::new("ipc", "ticks"));
        assert_eq!(config.metric_labels(), MetricLabels::new("IPC", "Ticks"));
        assert_eq!(config.plot.width, 1000);
        assert!(!config.plot.annotate);
        assert_eq!(config.ingest.metrics.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
mode = "lenient"

[fields]
throughput = "system.cpu.ipc"
duration = "simSeconds"

[labels]
duration = "Seconds"

[plot]
width = 1200
height = 700
title = "L2 size sweep"
annotate = true
output = "out/sweep.svg"

[ingest]
all_metrics = true
"#;
        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.mode, LoadMode::Lenient);
        assert_eq!(config.load_options().fields.throughput, "system.cpu.ipc");
        assert_eq!(config.metric_labels(), MetricLabels::new("IPC", "Seconds"));

        let scatter = config.scatter_options();
        assert_eq!((scatter.width, scatter.height), (1200, 700));
        assert_eq!(scatter.title.as_deref(), Some("L2 size sweep"));
        assert!(scatter.annotate);
        assert_eq!(config.plot.output, Some(PathBuf::from("out/sweep.svg")));
        assert_eq!(config.metric_selection(), MetricSelection::All);
    }

    #[test]
    fn test_custom_ingest_metrics() {
        let toml = r#"
[ingest.metrics]
ipc = "system.cpu.ipc"
"#;
        let config = AnalysisConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.metric_selection(),
            MetricSelection::Named(vec![("ipc".to_string(), "system.cpu.ipc".to_string())])
        );
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let err = AnalysisConfig::from_toml_str(r#"mode = "sloppy""#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AnalysisConfig::from_toml_str("[fields]\nthroughpt = \"ipc\"").is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_empty_field() {
        let mut config = AnalysisConfig::default();
        config.fields.duration = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_same_fields() {
        let mut config = AnalysisConfig::default();
        config.fields.duration = "ipc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_plot_size() {
        let mut config = AnalysisConfig::default();
        config.plot.width = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_empty_ingest_selection() {
        let mut config = AnalysisConfig::default();
        config.ingest.metrics.clear();
        assert!(config.validate().is_err());
        config.ingest.all_metrics = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = AnalysisConfig::from_file("/nonexistent/simlens.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
