use bluemind_logic::forecast::forecast;
use bluemind_logic::parameters::EnvironmentalParameters;
use bluemind_logic::population::{step, EcosystemState};
use bluemind_logic::record::SimulationRecord;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn bench_step(c: &mut Criterion) {
    let state = EcosystemState::default();
    c.bench_function("population_step", |b| b.iter(|| step(black_box(&state), 1)));
}

fn bench_record_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_run");

    for weeks in [52u32, 260, 520] {
        group.bench_with_input(BenchmarkId::new("weeks", weeks), &weeks, |b, &weeks| {
            b.iter_batched(
                || SimulationRecord::new("bench", "run", EnvironmentalParameters::default()),
                |mut record| {
                    for _ in 0..weeks {
                        record.advance(1);
                    }
                    record
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let state = EcosystemState::default();
    c.bench_function("forecast_52", |b| b.iter(|| forecast(black_box(&state), 52)));
}

criterion_group!(step_benches, bench_step, bench_record_run, bench_forecast);
criterion_main!(step_benches);
