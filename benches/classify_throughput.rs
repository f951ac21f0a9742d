/// Baseline + classification benchmarks
///
/// Measures the load → baseline → classify pipeline over synthetic
/// artifacts of increasing size, and the SVG rendering of one plot.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use simlens::analysis::Analysis;
use simlens::baseline::Baseline;
use simlens::classify::classify_all;
use simlens::record::{LoadOptions, MetricFields, RecordSet, StatRecord};
use simlens::scatter::{render_svg, ScatterOptions, ScatterSpec};

fn synthetic_runs(n: usize) -> RecordSet {
    let records = (0..n)
        .map(|i| {
            let ipc = 0.2 + (i % 17) as f64 * 0.05;
            let ticks = 50_000_000.0 + (i % 23) as f64 * 3_500_000.0;
            StatRecord::new(format!("se_{i}.py"), ipc, ticks)
        })
        .collect();
    RecordSet::new(records, MetricFields::default())
}

fn synthetic_artifact(n: usize) -> String {
    let mut doc = serde_json::Map::new();
    for record in &synthetic_runs(n) {
        doc.insert(
            record.run_id.clone(),
            serde_json::json!({ "ipc": record.throughput, "ticks": record.duration }),
        );
    }
    serde_json::Value::Object(doc).to_string()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [10, 1_000, 100_000] {
        let set = synthetic_runs(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("baseline_and_classify", size), &set, |b, set| {
            b.iter(|| {
                let baseline = Baseline::compute(black_box(set)).unwrap();
                classify_all(set, &baseline)
            });
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    let options = LoadOptions::default();

    for size in [10, 1_000, 10_000] {
        let json = synthetic_artifact(size);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("from_json_str", size), &json, |b, json| {
            b.iter(|| RecordSet::from_json_str(black_box(json), &options).unwrap());
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let analysis = Analysis::from_records(synthetic_runs(100)).unwrap();
    let options = ScatterOptions {
        annotate: true,
        ..ScatterOptions::default()
    };
    let spec = ScatterSpec::build(
        analysis.records(),
        analysis.baseline(),
        analysis.classifications(),
        &options,
    );

    c.bench_function("render_svg_100_runs", |b| {
        b.iter(|| render_svg(black_box(&spec)).unwrap());
    });
}

criterion_group!(benches, bench_classify, bench_load, bench_render);
criterion_main!(benches);
