//! Example: Sensitivity Tables as DataFrames
//!
//! Runs the valuation under both capital conventions and exports the
//! sensitivity grid and one-way sweeps as polars `DataFrame`s:
//! - `schedule_frame`: the discounted projection schedule
//! - `grid_frame`: per-share value by WACC and terminal growth, long format
//! - `sweep_frame`: tornado inputs for growth and margin

use fairvalue::{
    model::{AxisSpec, DcfModel, GridSpec},
    primitives::{Assumptions, CapitalConvention, CompanyFinancials, Statement, TimeSeries},
    utils::{grid_frame, schedule_frame, sweep_frame},
};

fn series(values: &[(i32, f64)]) -> TimeSeries {
    TimeSeries::from_values(values.iter().copied())
}

fn software_co() -> CompanyFinancials {
    let mut fin = CompanyFinancials::new("SOFT");
    fin.income = Statement::new()
        .with("Total Revenue", series(&[(2021, 800.0), (2022, 960.0), (2023, 1_130.0)]))
        .with("EBIT", series(&[(2021, 120.0), (2022, 158.0), (2023, 198.0)]))
        .with("Reconciled Depreciation", series(&[(2021, 40.0), (2022, 46.0), (2023, 52.0)]));
    fin.balance = Statement::new()
        .with("Net PPE", series(&[(2021, 300.0), (2022, 340.0), (2023, 390.0)]))
        .with("Current Assets", series(&[(2021, 420.0), (2022, 500.0), (2023, 580.0)]))
        .with("Current Liabilities", series(&[(2021, 350.0), (2022, 410.0), (2023, 470.0)]))
        .with("Cash And Cash Equivalents", series(&[(2023, 400.0)]))
        .with("Total Debt", series(&[(2023, 150.0)]));
    fin.cash_flow = Statement::new()
        .with("Capital Expenditure", series(&[(2021, -55.0), (2022, -72.0), (2023, -90.0)]));
    fin.facts.shares_outstanding = Some(80.0);
    fin
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let financials = software_co();
    let grid_spec = GridSpec {
        discount_rate: AxisSpec::new(0.08, 0.12, 0.02),
        terminal_growth: AxisSpec::new(0.02, 0.04, 0.01),
        parallel: true,
    };

    for convention in [CapitalConvention::PercentOfRevenue, CapitalConvention::BalanceSheet] {
        println!("=== {} ({convention}) ===\n", financials.symbol);

        let assumptions = Assumptions::from_history().with_convention(convention);
        let model = DcfModel::new(&financials, assumptions)?;

        let run = model.run()?;
        println!("{}\n", schedule_frame(&run.discounted.rows)?);
        println!("Value per share: {:.2}\n", run.result.per_share);

        let grid = model.sensitivity(&grid_spec)?;
        println!("{}\n", grid_frame(&grid)?);

        let sweeps = model
            .default_sweeps()?
            .iter()
            .map(|spec| model.sweep(spec))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}\n", sweep_frame(&sweeps)?);
    }

    Ok(())
}
