//! Benchmarks for fairvalue-model valuation runs.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fairvalue_model::{AxisSpec, DcfModel, GridSpec};
use fairvalue_primitives::{Assumptions, CompanyFinancials, Statement, TimeSeries};
use rand::Rng;

fn random_financials(years: i32) -> CompanyFinancials {
    let mut rng = rand::thread_rng();
    let mut revenue = Vec::new();
    let mut ebit = Vec::new();
    let mut level = 1_000.0;
    for year in 2000..2000 + years {
        level *= 1.0 + rng.gen_range(-0.05..0.15);
        revenue.push((year, level));
        ebit.push((year, level * rng.gen_range(0.05..0.25)));
    }

    let mut fin = CompanyFinancials::new("BENCH");
    fin.income = Statement::new()
        .with("Total Revenue", TimeSeries::from_values(revenue))
        .with("EBIT", TimeSeries::from_values(ebit));
    fin.balance = Statement::new()
        .with("Cash And Cash Equivalents", TimeSeries::from_values([(2000 + years - 1, 250.0)]))
        .with("Total Debt", TimeSeries::from_values([(2000 + years - 1, 400.0)]));
    fin.facts.shares_outstanding = Some(100.0);
    fin
}

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("valuation_run");
    let model = DcfModel::new(&random_financials(10), Assumptions::default()).unwrap();

    for horizon in [5_u32, 10, 30] {
        let a = model.assumptions().with_horizon(horizon);
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &a, |b, a| {
            b.iter(|| model.run_with(black_box(a)).unwrap());
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let fin = random_financials(40);
    c.bench_function("extract_ratios_40y", |b| {
        b.iter(|| fairvalue_model::extract_ratios(black_box(&fin)).unwrap());
    });
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity_grid");
    let model = DcfModel::new(&random_financials(10), Assumptions::default()).unwrap();

    // 81 cells by default, 1681 with the fine axes
    let fine = GridSpec {
        discount_rate: AxisSpec::new(0.06, 0.26, 0.005),
        terminal_growth: AxisSpec::new(0.0, 0.04, 0.001),
        parallel: true,
    };
    for (name, spec) in [
        ("default_parallel", GridSpec::default()),
        ("default_serial", GridSpec { parallel: false, ..GridSpec::default() }),
        ("fine_parallel", fine),
        ("fine_serial", GridSpec { parallel: false, ..fine }),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &spec, |b, spec| {
            b.iter(|| model.sensitivity(black_box(spec)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_run, bench_extraction, bench_grid);
criterion_main!(benches);
