//! DCF valuation CLI tool.
//!
//! Values a company from statements stored as CSV files and prints the full
//! report: historical ratios, projection, valuation, sensitivity grid,
//! sweeps and football field.
//!
//! Usage: `cargo run --bin valuate --features cli -- TICKER [options]`
//! Example: `cargo run --bin valuate --features cli -- ACME --data data --wacc 0.10`

use std::{
    env,
    error::Error,
    fs::File,
    path::{Path, PathBuf},
};

use fairvalue::{
    model::{DcfModel, ReportConfig, ValuationReport},
    primitives::{Assumptions, CapitalConvention, Symbol},
    traits::FinancialsProvider,
    utils::{CsvProvider, grid_frame, ratios_frame, schedule_frame, sweep_frame},
};
use polars::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default data directory.
const DEFAULT_DATA_DIR: &str = "data";

const USAGE: &str = "\
Usage: valuate TICKER [options]

Options (rates are decimals, 0.12 for 12%):
  --data DIR              statement directory (default: data)
  --horizon N             forecast years
  --wacc R                discount rate
  --terminal-growth G     perpetual growth rate
  --growth X              revenue growth override
  --margin X              EBIT margin override
  --tax X                 tax rate
  --shares N              share count override
  --convention C          percent-of-revenue | balance-sheet
  --from-history          derive every driver from history
  --no-sweeps             skip the one-way sweeps
  --export DIR            write schedule, grid, sweeps and ratios as CSV";

/// Parsed command line.
struct Options {
    symbol: Symbol,
    data: PathBuf,
    assumptions: Assumptions,
    sweeps: bool,
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    let options = match parse_options(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    let provider = CsvProvider::new(&options.data);
    let financials = provider.financials(&options.symbol)?;
    let model = DcfModel::new(&financials, options.assumptions)?;

    let config = ReportConfig { sweeps: options.sweeps, ..ReportConfig::default() };
    let report = ValuationReport::build(&model, &config);
    report.print_summary();

    if let Some(dir) = &options.export {
        export_report(&report, dir)?;
        println!("Wrote CSV output to {}", dir.display());
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let ticker = match args.first() {
        Some(t) if !t.starts_with('-') && !t.trim().is_empty() => t,
        Some(t) => return Err(format!("expected a ticker before options, got '{t}'")),
        None => return Err("missing ticker".to_string()),
    };
    let mut options = Options {
        symbol: Symbol::new(ticker),
        data: PathBuf::from(DEFAULT_DATA_DIR),
        assumptions: Assumptions::default(),
        sweeps: true,
        export: None,
    };
    if args.iter().any(|a| a == "--from-history") {
        options.assumptions = Assumptions::from_history();
    }

    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        let a = &mut options.assumptions;
        match flag.as_str() {
            "--from-history" => {}
            "--no-sweeps" => options.sweeps = false,
            "--data" => options.data = PathBuf::from(value(flag, rest.next())?),
            "--export" => options.export = Some(PathBuf::from(value(flag, rest.next())?)),
            "--horizon" => a.horizon = parse(flag, rest.next())?,
            "--wacc" => a.discount_rate = parse(flag, rest.next())?,
            "--terminal-growth" => a.terminal_growth = parse(flag, rest.next())?,
            "--growth" => a.revenue_growth = Some(parse(flag, rest.next())?),
            "--margin" => a.ebit_margin = Some(parse(flag, rest.next())?),
            "--tax" => a.tax_rate = parse(flag, rest.next())?,
            "--shares" => a.shares_override = Some(parse(flag, rest.next())?),
            "--convention" => {
                let convention = match value(flag, rest.next())? {
                    "percent-of-revenue" => CapitalConvention::PercentOfRevenue,
                    "balance-sheet" => CapitalConvention::BalanceSheet,
                    other => return Err(format!("unknown convention '{other}'")),
                };
                *a = a.with_convention(convention);
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(options)
}

fn value<'a>(flag: &str, v: Option<&'a String>) -> Result<&'a str, String> {
    v.map(String::as_str).ok_or_else(|| format!("{flag} needs a value"))
}

fn parse<T: std::str::FromStr>(flag: &str, v: Option<&String>) -> Result<T, String> {
    let v = value(flag, v)?;
    v.parse().map_err(|_| format!("invalid value '{v}' for {flag}"))
}

/// Write every available section as a CSV file under `dir`.
fn export_report(report: &ValuationReport, dir: &Path) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;

    let mut frames = vec![("ratios", ratios_frame(&report.ratios)?)];
    if let Ok(run) = &report.run {
        frames.push(("schedule", schedule_frame(&run.discounted.rows)?));
    }
    if let Ok(grid) = &report.grid {
        frames.push(("grid", grid_frame(grid)?));
    }
    if let Ok(sweeps) = &report.sweeps {
        frames.push(("sweeps", sweep_frame(sweeps)?));
    }

    for (name, mut df) in frames {
        let mut file = File::create(dir.join(format!("{name}.csv")))?;
        CsvWriter::new(&mut file).finish(&mut df)?;
    }
    Ok(())
}
