//! Pipeline performance benchmarks.
//!
//! Measures window computation, lookup expansion and the full pipeline
//! across table sizes.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use assumptions::lookup::MatchRequest;
use assumptions::model::{rule_row, LookupConfiguration};
use assumptions::{
    adjust_ranges, CellValue, CompositeEvaluator, LookupInputs, LookupTable, MatchBehavior, Row, Rule,
    TableEngine, WellContext,
};

const KEYS: &[&str] = &["Oil", "Gas", "NGL", "Water", "CO2", "Drip Condensate"];

/// Generate a synthetic table of `groups` groups with `depth` rows each.
fn generate_table(groups: usize, depth: usize) -> Vec<Row> {
    let mut rows = Vec::with_capacity(groups * depth);

    for g in 0..groups {
        // Mix of criteria schemes
        let criteria = match g % 3 {
            0 => "As Of",
            1 => "Dates",
            2 => "Oil Rate",
            _ => unreachable!(),
        };
        for i in 0..depth {
            let period = match criteria {
                "Dates" => format!("{:02}/{}", i % 12 + 1, 2024 + i / 12),
                "Oil Rate" => (i as i64 * 250).to_string(),
                _ => ((i % 12) + 1).to_string(),
            };
            let row = if i == 0 {
                Row::new(format!("{}-{}", g, i))
                    .with_key(KEYS[g % KEYS.len()])
                    .with_category(format!("Category {}", g))
                    .with_criteria(criteria)
            } else {
                Row::new(format!("{}-{}", g, i)).nested()
            };
            rows.push(row.with_period(period).with_value(i as f64 * 1.5));
        }
    }

    rows
}

/// Generate `count` lookup references and one table with a ratio header.
fn generate_lookup(count: usize) -> (Vec<Row>, LookupInputs) {
    let rows = (0..count)
        .map(|i| {
            Row::new(format!("elt-{}", i))
                .with_key(KEYS[i % KEYS.len()])
                .with_lookup_table("table", format!("Table {}", i))
        })
        .collect();

    let mut configuration = LookupConfiguration::default();
    configuration.selected_headers = vec!["state".to_string(), "lateral".to_string()];
    configuration
        .selected_headers_match_behavior
        .insert("lateral".to_string(), MatchBehavior::Ratio);

    let table = LookupTable {
        configuration,
        rules: vec![Rule::new(rule_row([
            ("state", CellValue::from("TX")),
            ("lateral", CellValue::from(5000)),
            ("price", CellValue::from(-4)),
        ]))],
        lines: (0..5)
            .map(|i| {
                Row::new(format!("line-{}", i))
                    .with_key("Oil")
                    .with_criteria("Flat")
                    .with_lookup_by("value", "price")
            })
            .collect(),
    };

    let inputs = LookupInputs {
        tables: HashMap::from([("table".to_string(), table)]),
        well: Some(WellContext::new(
            "well-1",
            rule_row([("state", CellValue::from("TX")), ("lateral", CellValue::from(7500))]),
        )),
    };

    (rows, inputs)
}

fn first_rule(_: &MatchRequest<'_>, rules: &[Rule]) -> Option<usize> {
    (!rules.is_empty()).then_some(0)
}

/// Benchmark window computation across table sizes.
fn bench_adjust_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust_ranges");
    let rate_labels = vec!["Oil Rate".to_string()];

    for groups in [10, 100, 1_000].iter() {
        let rows = generate_table(*groups, 8);

        group.throughput(Throughput::Elements(rows.len() as u64));
        group.bench_with_input(BenchmarkId::new("groups", groups), &rows, |b, rows| {
            b.iter(|| black_box(adjust_ranges(rows, &[], &rate_labels)))
        });
    }

    group.finish();
}

/// Benchmark the full pipeline without lookups.
fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    let engine = TableEngine::new();
    let evaluator = CompositeEvaluator::new();

    for groups in [10, 100, 1_000].iter() {
        let rows = generate_table(*groups, 8);

        group.throughput(Throughput::Elements(rows.len() as u64));
        group.bench_with_input(BenchmarkId::new("groups", groups), &rows, |b, rows| {
            b.iter(|| black_box(engine.process(rows, &evaluator).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark lookup expansion through the pipeline.
fn bench_process_with_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_with_lookup");
    let engine = TableEngine::new();
    let evaluator = CompositeEvaluator::empty();

    for count in [10, 100, 1_000].iter() {
        let (rows, inputs) = generate_lookup(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("references", count), &rows, |b, rows| {
            b.iter(|| {
                black_box(
                    engine
                        .process_with_lookup(rows, &inputs, first_rule, &evaluator)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_adjust_ranges,
    bench_process,
    bench_process_with_lookup
);
criterion_main!(benches);
