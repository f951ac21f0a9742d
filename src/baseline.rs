//! Population baselines over a record set
//!
//! A baseline is the mean/min/max of the throughput and duration metrics
//! across every run in one artifact. Classification compares each run
//! against the means; min/max only feed the annotation text and plot
//! extents.

use crate::error::{AnalysisError, Result};
use crate::record::RecordSet;
use serde::Serialize;
use tracing::debug;

/// Summary statistics for one record set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    /// Number of runs the baseline was computed over
    pub count: usize,
    pub mean_throughput: f64,
    pub mean_duration: f64,
    pub min_throughput: f64,
    pub max_throughput: f64,
    pub min_duration: f64,
    pub max_duration: f64,
}

/// Running extent and mean of one metric
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    n: usize,
    mean: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            n: 0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    // Incremental mean: the accumulator never holds the raw sum, so tick
    // counts near f64::MAX cannot overflow it.
    fn push(&mut self, value: f64) {
        self.n += 1;
        self.mean += (value - self.mean) / self.n as f64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Mean clamped to the observed range
    fn mean(&self) -> f64 {
        self.mean.clamp(self.min, self.max)
    }
}

impl Baseline {
    /// Compute the baseline of a record set
    ///
    /// The throughput/duration field names were bound when the set was
    /// loaded (see [`RecordSet::fields`]).
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptyInput`] if the set has no records. A mean over
    /// nothing is undefined and is never reported as NaN or zero.
    ///
    /// # Example
    /// ```
    /// use simlens::baseline::Baseline;
    /// use simlens::record::{MetricFields, RecordSet, StatRecord};
    ///
    /// let set = RecordSet::new(
    ///     vec![StatRecord::new("r1", 1.0, 1000.0), StatRecord::new("r2", 3.0, 200.0)],
    ///     MetricFields::default(),
    /// );
    /// let baseline = Baseline::compute(&set).unwrap();
    /// assert_eq!(baseline.mean_throughput, 2.0);
    /// assert_eq!(baseline.mean_duration, 600.0);
    /// ```
    pub fn compute(records: &RecordSet) -> Result<Self> {
        if records.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let mut throughput = Accumulator::new();
        let mut duration = Accumulator::new();
        for record in records {
            throughput.push(record.throughput);
            duration.push(record.duration);
        }

        let baseline = Self {
            count: records.len(),
            mean_throughput: throughput.mean(),
            mean_duration: duration.mean(),
            min_throughput: throughput.min,
            max_throughput: throughput.max,
            min_duration: duration.min,
            max_duration: duration.max,
        };

        debug!(
            throughput_field = %records.fields().throughput,
            duration_field = %records.fields().duration,
            runs = baseline.count,
            mean_throughput = baseline.mean_throughput,
            mean_duration = baseline.mean_duration,
            "computed baseline"
        );

        Ok(baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MetricFields, StatRecord};

    fn set(values: &[(f64, f64)]) -> RecordSet {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &(t, d))| StatRecord::new(format!("r{}", i + 1), t, d))
            .collect();
        RecordSet::new(records, MetricFields::default())
    }

    #[test]
    fn test_two_run_means() {
        let b = Baseline::compute(&set(&[(1.0, 1000.0), (3.0, 200.0)])).unwrap();
        assert_eq!(b.count, 2);
        assert_eq!(b.mean_throughput, 2.0);
        assert_eq!(b.mean_duration, 600.0);
        assert_eq!(b.min_throughput, 1.0);
        assert_eq!(b.max_throughput, 3.0);
        assert_eq!(b.min_duration, 200.0);
        assert_eq!(b.max_duration, 1000.0);
    }

    #[test]
    fn test_single_run_mean_equals_value() {
        let b = Baseline::compute(&set(&[(1.37, 123456789.0)])).unwrap();
        assert_eq!(b.mean_throughput, 1.37);
        assert_eq!(b.mean_duration, 123456789.0);
        assert_eq!(b.min_throughput, b.max_throughput);
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = Baseline::compute(&set(&[])).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn test_identical_values_mean_is_exact() {
        // 0.1 summed three times and divided by 3 is not 0.1 in f64
        let b = Baseline::compute(&set(&[(0.1, 0.1), (0.1, 0.1), (0.1, 0.1)])).unwrap();
        assert_eq!(b.mean_throughput, 0.1);
        assert_eq!(b.mean_duration, 0.1);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let big = f64::MAX / 2.0 * 1.5;
        let b = Baseline::compute(&set(&[(1.0, big), (1.0, big), (1.0, big)])).unwrap();
        assert!(b.mean_duration.is_finite());
        assert_eq!(b.mean_duration, big);
    }

    #[test]
    fn test_zero_filled_records_pull_mean_down() {
        // Lenient zero-fill biases the population mean; this is expected
        let b = Baseline::compute(&set(&[(0.0, 100.0), (2.0, 100.0)])).unwrap();
        assert_eq!(b.mean_throughput, 1.0);
        assert_eq!(b.min_throughput, 0.0);
    }
}
