//! Property-based tests for the baseline and classification pipeline
//!
//! Properties covered:
//! 1. Baseline means stay inside the observed extent
//! 2. A run is never both a bottleneck suspect and an optimal candidate
//! 3. Classification is a pure function of its inputs
//! 4. Ties with the mean never produce a label
//! 5. Lenient zero-fill and strict loading agree on complete artifacts

use proptest::prelude::*;
use simlens::baseline::Baseline;
use simlens::classify::{classify, classify_all, Label};
use simlens::record::{LoadMode, LoadOptions, MetricFields, RecordSet, StatRecord};
use simlens::AnalysisError;

fn record_set(runs: &[(f64, f64)]) -> RecordSet {
    let records = runs
        .iter()
        .enumerate()
        .map(|(i, (ipc, ticks))| StatRecord::new(format!("run_{i}.py"), *ipc, *ticks))
        .collect();
    RecordSet::new(records, MetricFields::default())
}

fn runs_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..8.0, 0.0f64..1.0e12), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_baseline_mean_within_extent(runs in runs_strategy()) {
        let set = record_set(&runs);
        let baseline = Baseline::compute(&set).unwrap();

        prop_assert_eq!(baseline.count, runs.len());
        prop_assert!(baseline.min_throughput <= baseline.mean_throughput);
        prop_assert!(baseline.mean_throughput <= baseline.max_throughput);
        prop_assert!(baseline.min_duration <= baseline.mean_duration);
        prop_assert!(baseline.mean_duration <= baseline.max_duration);
    }

    #[test]
    fn prop_labels_mutually_exclusive(runs in runs_strategy()) {
        let set = record_set(&runs);
        let baseline = Baseline::compute(&set).unwrap();

        for record in &set {
            let class = classify(record, &baseline);
            prop_assert!(
                !(class.contains(Label::BottleneckSuspect)
                    && class.contains(Label::OptimalCandidate))
            );
        }
    }

    #[test]
    fn prop_classification_idempotent(runs in runs_strategy()) {
        let set = record_set(&runs);
        let first = Baseline::compute(&set).unwrap();
        let second = Baseline::compute(&set).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(classify_all(&set, &first), classify_all(&set, &second));
    }

    #[test]
    fn prop_duration_tie_is_nominal(ipc in 0.0f64..8.0, runs in runs_strategy()) {
        let set = record_set(&runs);
        let baseline = Baseline::compute(&set).unwrap();

        let on_mean = StatRecord::new("tie.py", ipc, baseline.mean_duration);
        prop_assert!(classify(&on_mean, &baseline).is_nominal());
    }

    #[test]
    fn prop_throughput_tie_is_nominal(ticks in 0.0f64..1.0e12, runs in runs_strategy()) {
        let set = record_set(&runs);
        let baseline = Baseline::compute(&set).unwrap();

        let on_mean = StatRecord::new("tie.py", baseline.mean_throughput, ticks);
        prop_assert!(classify(&on_mean, &baseline).is_nominal());
    }

    #[test]
    fn prop_identical_runs_are_all_nominal(ipc in 0.0f64..8.0, ticks in 0u64..1_000_000_000, n in 1usize..20) {
        let runs = vec![(ipc, ticks as f64); n];
        let set = record_set(&runs);
        let baseline = Baseline::compute(&set).unwrap();
        let classes = classify_all(&set, &baseline);

        prop_assert!(!classes.any(Label::BottleneckSuspect));
        prop_assert!(!classes.any(Label::OptimalCandidate));
    }

    #[test]
    fn prop_load_modes_agree_on_complete_artifacts(runs in runs_strategy()) {
        let mut doc = serde_json::Map::new();
        for (i, (ipc, ticks)) in runs.iter().enumerate() {
            doc.insert(
                format!("run_{i}.py"),
                serde_json::json!({ "ipc": ipc, "ticks": ticks }),
            );
        }
        let doc = serde_json::Value::Object(doc);

        let strict = RecordSet::from_value(doc.clone(), &LoadOptions::default()).unwrap();
        let lenient = RecordSet::from_value(
            doc,
            &LoadOptions { mode: LoadMode::Lenient, ..LoadOptions::default() },
        )
        .unwrap();

        prop_assert_eq!(strict, lenient);
    }
}

#[test]
fn test_empty_record_set_has_no_baseline() {
    let set = RecordSet::new(Vec::new(), MetricFields::default());
    assert!(matches!(
        Baseline::compute(&set),
        Err(AnalysisError::EmptyInput)
    ));
}

#[test]
fn test_single_run_is_its_own_baseline() {
    let set = record_set(&[(1.25, 4096.0)]);
    let baseline = Baseline::compute(&set).unwrap();

    assert_eq!(baseline.mean_throughput, 1.25);
    assert_eq!(baseline.mean_duration, 4096.0);
    assert!(classify_all(&set, &baseline).get("run_0.py").is_nominal());
}
