use criterion::{criterion_group, criterion_main, Criterion};
use pdr_core::{RunRecord, RunSet};
use pdr_scatter::{CategorySpec, HarnessSettings, PlotSource, ScatterOptions, ScatterPlotReport};

fn synthetic_runs(count: usize) -> RunSet {
    RunSet::from_runs((0..count).map(|idx| {
        let record = RunRecord::new()
            .with("domain", format!("domain-{}", idx % 37).as_str())
            .with("problem", format!("p{idx}.pddl").as_str())
            .with("layer_size", (idx % 500) as i64)
            .with("total_time", (idx % 97) as f64 * 0.25);
        (format!("run-{idx:06}"), record)
    }))
}

fn bench_pipeline(c: &mut Criterion) {
    let runs = synthetic_runs(20_000);
    let mut options = ScatterOptions::new(PlotSource::attributes("layer_size", "total_time"));
    options.category = CategorySpec::Domain;
    let report = ScatterPlotReport::new(options, &HarnessSettings::default()).expect("report");

    c.bench_function("scatter_pipeline", |b| {
        b.iter(|| report.build(&runs).expect("spec"));
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
