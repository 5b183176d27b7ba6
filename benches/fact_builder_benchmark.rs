use accident_warehouse::models::{AccidentRecord, RoadConditionRecord};
use accident_warehouse::processors::{DimensionBuilder, FactBuilder};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Create test data for benchmarking
fn create_test_batches(
    accident_count: usize,
    location_count: usize,
) -> (Vec<AccidentRecord>, Vec<RoadConditionRecord>) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let severities = ["Minor", "Moderate", "Severe", "Unknown"];

    let accidents = (0..accident_count)
        .map(|i| {
            AccidentRecord::new(
                i as i64 + 1,
                start + Duration::minutes(i as i64 * 37),
                &format!("Location {}", i % location_count),
                (i % 4) as i64,
                severities[i % severities.len()],
            )
        })
        .collect();

    // Hourly readings at every location except the last, which exercises the fallback
    let hours = (accident_count * 37 / 60).max(1);
    let road_conditions = (0..location_count.saturating_sub(1))
        .flat_map(|loc| {
            (0..hours).map(move |h| {
                RoadConditionRecord::new(
                    (loc * hours + h) as i64 + 1,
                    &format!("Location {}", loc),
                    start + Duration::hours(h as i64),
                    "Dry",
                    "Good",
                )
            })
        })
        .collect();

    (accidents, road_conditions)
}

fn benchmark_fact_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("fact_builder");

    for accident_count in [1_000, 10_000] {
        let (accidents, road_conditions) = create_test_batches(accident_count, 20);
        let dimensions = DimensionBuilder::new();
        let locations = dimensions.build_location_dim(&accidents);
        let dates = dimensions.build_date_dim(&accidents);

        group.bench_with_input(
            BenchmarkId::new("build", accident_count),
            &accident_count,
            |b, _| {
                b.iter(|| {
                    let mut builder = FactBuilder::seeded(42);
                    black_box(
                        builder
                            .build(&accidents, &locations, &dates, &road_conditions)
                            .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

fn benchmark_dimension_builder(c: &mut Criterion) {
    let (accidents, _) = create_test_batches(10_000, 50);
    let builder = DimensionBuilder::new();

    c.bench_function("build_location_dim", |b| {
        b.iter(|| black_box(builder.build_location_dim(&accidents)))
    });
    c.bench_function("build_date_dim", |b| {
        b.iter(|| black_box(builder.build_date_dim(&accidents)))
    });
}

criterion_group!(benches, benchmark_fact_builder, benchmark_dimension_builder);
criterion_main!(benches);
