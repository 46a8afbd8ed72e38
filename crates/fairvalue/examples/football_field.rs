//! Example: Football Field from In-Memory Financials
//!
//! Builds a company's statements by hand, serves them through a
//! `StaticProvider`, and compares the DCF range with EV/EBITDA and P/E bands:
//! - `DcfModel::new`: prepare historical ratios once
//! - `DcfModel::sensitivity`: discount-rate by terminal-growth grid
//! - `DcfModel::football_field`: DCF interquartile band plus multiples

use fairvalue::{
    model::{DcfModel, GridSpec, MultiplesConfig},
    primitives::{Assumptions, CompanyFinancials, Statement, Symbol, TimeSeries},
    traits::{FinancialsProvider, StaticProvider},
};

fn series(values: &[(i32, f64)]) -> TimeSeries {
    TimeSeries::from_values(values.iter().copied())
}

fn industrial_co() -> CompanyFinancials {
    let mut fin = CompanyFinancials::new("INDCO");
    fin.income = Statement::new()
        .with(
            "Total Revenue",
            series(&[(2020, 4_200.0), (2021, 4_650.0), (2022, 5_010.0), (2023, 5_480.0)]),
        )
        .with("EBIT", series(&[(2020, 590.0), (2021, 680.0), (2022, 705.0), (2023, 790.0)]))
        .with("EBITDA", series(&[(2020, 810.0), (2021, 910.0), (2022, 950.0), (2023, 1_050.0)]))
        .with("Net Income", series(&[(2020, 410.0), (2021, 470.0), (2022, 480.0), (2023, 545.0)]));
    fin.balance = Statement::new()
        .with("Cash And Cash Equivalents", series(&[(2023, 620.0)]))
        .with("Total Debt", series(&[(2023, 1_900.0)]));
    fin.facts.shares_outstanding = Some(250.0);
    fin.facts.price = Some(27.5);
    fin
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Football Field ===\n");

    let provider = StaticProvider::new().with(industrial_co());
    let financials = provider.financials(&Symbol::new("INDCO"))?;

    // Growth and margin from history, everything else from the defaults
    let assumptions =
        Assumptions { revenue_growth: None, ebit_margin: None, ..Assumptions::default() };
    let model = DcfModel::new(&financials, assumptions)?;

    let run = model.run()?;
    println!("Base case ({} via {})", financials.symbol, provider.name());
    println!("  Enterprise value: {:>10.1}", run.result.enterprise_value);
    println!("  Value per share:  {:>10.2}", run.result.per_share);
    println!("  Market price:     {:>10.2}\n", financials.facts.price.unwrap_or(f64::NAN));

    let grid = model.sensitivity(&GridSpec::default())?;
    let field = model.football_field(Some(&grid), &MultiplesConfig::default())?;

    println!("{:<20} {:>10} {:>10} {:>10}", "Method", "Low", "Mid", "High");
    println!("{:-<20} {:-^10} {:-^10} {:-^10}", "", "", "", "");
    for band in &field.bands {
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2}",
            band.method.to_string(),
            band.low(),
            band.mid(),
            band.high()
        );
    }
    if let Some((low, high)) = field.span() {
        println!("\nOverall range: {low:.2} .. {high:.2}");
    }
    for w in &field.warnings {
        println!("Warning: {w}");
    }

    Ok(())
}
