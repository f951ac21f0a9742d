//! Statistics artifact loading
//!
//! The artifact is a JSON object mapping run identifiers (simulator script
//! names) to flat objects of metric name → value, for example:
//!
//! ```json
//! {
//!   "se_l2_256kB.py": { "ipc": 1.42, "ticks": 183021000, "cpi": 0.70 },
//!   "se_l2_1MB.py":   { "ipc": 1.87, "ticks": 139004000, "cpi": 0.53 }
//! }
//! ```
//!
//! Two fields per run are interpreted: a throughput metric (higher is
//! better) and a duration metric (lower is better). Their names are plain
//! configuration strings, so hierarchical gem5 names such as
//! `system.cpu.ipc` work the same as short aliases. Everything else in the
//! run object is carried along untouched.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// How absent throughput/duration fields are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Absent field is a `SourceFormat` error
    #[default]
    Strict,
    /// Absent field is read as `0.0`
    Lenient,
}

/// Names of the two interpreted metrics in each run object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricFields {
    /// Rate-type metric, e.g. `ipc` or `system.cpu.ipc`
    pub throughput: String,
    /// Cost-type metric, e.g. `ticks` or `simSeconds`
    pub duration: String,
}

impl Default for MetricFields {
    fn default() -> Self {
        Self {
            throughput: "ipc".to_string(),
            duration: "ticks".to_string(),
        }
    }
}

impl MetricFields {
    pub fn new(throughput: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            throughput: throughput.into(),
            duration: duration.into(),
        }
    }
}

/// Options for a single artifact load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub fields: MetricFields,
    pub mode: LoadMode,
}

/// One simulated run's outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRecord {
    /// Originating configuration/script name
    pub run_id: String,
    /// Instructions-per-cycle style rate
    pub throughput: f64,
    /// Elapsed ticks or seconds
    pub duration: f64,
    /// Remaining fields of the run object, in source order
    pub extra: Map<String, Value>,
}

impl StatRecord {
    pub fn new(run_id: impl Into<String>, throughput: f64, duration: f64) -> Self {
        Self {
            run_id: run_id.into(),
            throughput,
            duration,
            extra: Map::new(),
        }
    }
}

/// Ordered, immutable set of run records from one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<StatRecord>,
    fields: MetricFields,
}

impl RecordSet {
    /// Build a record set directly, e.g. from records produced in memory
    pub fn new(records: Vec<StatRecord>, fields: MetricFields) -> Self {
        Self { records, fields }
    }

    /// Load a record set from a JSON artifact on disk
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => {
                AnalysisError::format(format!("not UTF-8 text: {}", e)).with_path(path)
            }
            _ => AnalysisError::SourceNotFound {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let set = Self::from_json_str(&contents, options).map_err(|e| e.with_path(path))?;
        debug!(
            path = %path.display(),
            runs = set.len(),
            mode = ?options.mode,
            "loaded statistics artifact"
        );
        Ok(set)
    }

    /// Parse a record set from JSON text
    pub fn from_json_str(contents: &str, options: &LoadOptions) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|e| AnalysisError::format(format!("invalid JSON: {}", e)))?;
        Self::from_value(value, options)
    }

    /// Build a record set from an already-parsed JSON document
    pub fn from_value(value: Value, options: &LoadOptions) -> Result<Self> {
        let Value::Object(runs) = value else {
            return Err(AnalysisError::format(format!(
                "top-level value must be an object of runs, got {}",
                kind_of(&value)
            )));
        };

        let mut records = Vec::with_capacity(runs.len());
        for (run_id, run) in runs {
            records.push(parse_run(run_id, run, options)?);
        }

        Ok(Self {
            records,
            fields: options.fields.clone(),
        })
    }

    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field names this set was loaded with
    pub fn fields(&self) -> &MetricFields {
        &self.fields
    }

    /// Look up a run by identifier
    pub fn get(&self, run_id: &str) -> Option<&StatRecord> {
        self.records.iter().find(|r| r.run_id == run_id)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a StatRecord;
    type IntoIter = std::slice::Iter<'a, StatRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn parse_run(run_id: String, run: Value, options: &LoadOptions) -> Result<StatRecord> {
    let Value::Object(mut metrics) = run else {
        return Err(AnalysisError::SourceFormat {
            path: None,
            run_id: Some(run_id),
            field: None,
            message: format!("run value must be an object, got {}", kind_of(&run)),
        });
    };

    let throughput = take_metric(&run_id, &options.fields.throughput, &mut metrics, options.mode)?;
    let duration = take_metric(&run_id, &options.fields.duration, &mut metrics, options.mode)?;

    Ok(StatRecord {
        run_id,
        throughput,
        duration,
        extra: metrics,
    })
}

fn take_metric(
    run_id: &str,
    field: &str,
    metrics: &mut Map<String, Value>,
    mode: LoadMode,
) -> Result<f64> {
    let value = metrics.shift_remove(field);

    match value.as_ref().map(coerce).transpose() {
        Ok(Some(Some(v))) => {
            if !v.is_finite() || v < 0.0 {
                return Err(AnalysisError::field_format(
                    run_id,
                    field,
                    format!("value must be a finite non-negative number, got {}", v),
                ));
            }
            Ok(v)
        }
        Ok(_) => match mode {
            LoadMode::Lenient => {
                warn!(run_id, field, "metric missing, treating as 0.0");
                Ok(0.0)
            }
            LoadMode::Strict => Err(AnalysisError::field_format(
                run_id,
                field,
                "field is missing (use lenient mode to read it as 0.0)",
            )),
        },
        Err(kind) => Err(AnalysisError::field_format(
            run_id,
            field,
            format!("expected a number, got {}", kind),
        )),
    }
}

/// Coerce a JSON value to `f64`
///
/// `Ok(None)` means the value counts as absent (null, or a NaN marker as
/// written by full stats dumps). `Err` carries the offending value kind.
fn coerce(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| n.to_string()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(format!("string {:?}", s)),
        },
        other => Err(kind_of(other).to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
