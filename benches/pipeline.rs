use benchreport::input::{BenchmarkFile, RunInput};
use benchreport::report::Palette;
use benchreport::{Pipeline, RawEntry, Settings};
use criterion::{criterion_group, criterion_main, Criterion};

const ALGORITHMS: [&str; 6] = ["SonicDyn", "RapidJson", "YYJson", "SimdJson", "Serde", "Boost"];

fn synthetic_run(label: &str, categories: usize) -> RunInput {
    let mut benchmarks = Vec::new();
    for category in 0..categories {
        for kind in ["Encode", "Decode"] {
            for (i, algorithm) in ALGORITHMS.iter().enumerate() {
                benchmarks.push(RawEntry {
                    name: format!("case{category}/{kind}_{algorithm}"),
                    cpu_time: Some(((category + 1) * 100 + i * 37) as f64),
                    time_unit: Some("ns".to_owned()),
                    label: Some(format!("case{category}.json")),
                    run_type: None,
                });
            }
        }
    }
    RunInput {
        label: label.to_owned(),
        file: BenchmarkFile { benchmarks },
    }
}

fn process_run_benchmark(c: &mut Criterion) {
    let input = synthetic_run("target", 200);
    c.bench_function("process_run", |b| {
        b.iter(|| {
            let report = Pipeline::new(Settings::default()).run(vec![input.clone()]);
            let mut output = Vec::new();
            report.write_tables(&mut output, &Palette::PLAIN, true).unwrap();
        })
    });
}

criterion_group!(benches, process_run_benchmark);
criterion_main!(benches);
