//! A complete valuation report with per-section outcomes.

use fairvalue_primitives::{Assumptions, Symbol};
use tracing::warn;

use crate::{
    DcfModel, FootballField, GridSpec, HistoricalRatios, ModelError, MultiplesConfig, Ratio,
    SensitivityGrid, Sweep, ValuationRun,
};

/// What to include in a [`ValuationReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportConfig {
    /// Sensitivity grid axes.
    pub grid: GridSpec,
    /// Football field multiples.
    pub multiples: MultiplesConfig,
    /// Whether to run the default growth and margin sweeps.
    pub sweeps: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { grid: GridSpec::default(), multiples: MultiplesConfig::default(), sweeps: true }
    }
}

/// Every section of a valuation, each with its own outcome.
///
/// A failing section never prevents the others from being computed: a
/// company without EBITDA still gets a DCF and a P/E band.
#[derive(Debug, Clone)]
pub struct ValuationReport {
    /// Company symbol.
    pub symbol: Symbol,
    /// Assumptions used for the base run.
    pub assumptions: Assumptions,
    /// Historical ratios.
    pub ratios: HistoricalRatios,
    /// Current market price, if known.
    pub price: Option<f64>,
    /// Base-case run.
    pub run: Result<ValuationRun, ModelError>,
    /// Discount-rate by terminal-growth grid.
    pub grid: Result<SensitivityGrid, ModelError>,
    /// One-way sweeps.
    pub sweeps: Result<Vec<Sweep>, ModelError>,
    /// Football field.
    pub football_field: Result<FootballField, ModelError>,
}

impl ValuationReport {
    /// Build every section for `model`.
    #[must_use]
    pub fn build(model: &DcfModel, config: &ReportConfig) -> Self {
        let run = model.run();
        let grid = model.sensitivity(&config.grid);
        let sweeps = if config.sweeps {
            model
                .default_sweeps()
                .and_then(|specs| specs.iter().map(|s| model.sweep(s)).collect())
        } else {
            Ok(Vec::new())
        };
        let football_field = model.football_field(grid.as_ref().ok(), &config.multiples);

        let report = Self {
            symbol: model.symbol().clone(),
            assumptions: *model.assumptions(),
            ratios: model.ratios().clone(),
            price: model.price(),
            run,
            grid,
            sweeps,
            football_field,
        };
        for e in report.errors() {
            warn!(symbol = %report.symbol, error = %e, "report section unavailable");
        }
        report
    }

    /// Errors of every failed section.
    #[must_use]
    pub fn errors(&self) -> Vec<&ModelError> {
        [
            self.run.as_ref().err(),
            self.grid.as_ref().err(),
            self.sweeps.as_ref().err(),
            self.football_field.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Base-case value per share, if the run succeeded.
    #[must_use]
    pub fn per_share(&self) -> Option<f64> {
        self.run.as_ref().ok().map(|r| r.result.per_share)
    }

    /// Upside of the base-case value over the market price.
    #[must_use]
    pub fn upside(&self) -> Option<f64> {
        match (self.per_share(), self.price) {
            (Some(v), Some(p)) if p > 0.0 => Some(v / p - 1.0),
            _ => None,
        }
    }

    /// Print a concise summary of the valuation.
    pub fn print_summary(&self) {
        println!(
            "\n================================================================================"
        );
        println!("DCF VALUATION: {}", self.symbol);
        println!(
            "================================================================================"
        );
        let a = &self.assumptions;
        println!(
            "Horizon: {} years   WACC: {:.2}%   Terminal growth: {:.2}%   Tax: {:.2}%",
            a.horizon,
            a.discount_rate * 100.0,
            a.terminal_growth * 100.0,
            a.tax_rate * 100.0
        );
        println!("Capital convention: {}", a.convention);
        println!(
            "--------------------------------------------------------------------------------"
        );

        println!("\nHISTORICAL RATIOS:");
        println!("{:<40} {:>12} {:>8}", "Ratio", "Mean", "Years");
        println!("{:-<40} {:-^12} {:-^8}", "", "", "");
        for ratio in Ratio::ALL {
            match self.ratios.get(ratio) {
                Ok(v) => println!(
                    "{:<40} {:>11.2}% {:>8}",
                    ratio.to_string(),
                    v * 100.0,
                    self.ratios.observations(ratio).points.len()
                ),
                Err(_) => println!("{:<40} {:>12} {:>8}", ratio.to_string(), "n/a", 0),
            }
        }
        if let Some(cagr) = self.ratios.revenue_cagr() {
            println!("{:<40} {:>11.2}%", "revenue CAGR", cagr * 100.0);
        }

        match &self.run {
            Ok(run) => {
                println!("\nPROJECTION:");
                println!(
                    "{:<6} {:>12} {:>12} {:>12} {:>10} {:>10} {:>10} {:>12} {:>12}",
                    "Year", "Revenue", "EBIT", "NOPAT", "Dep", "Capex", "dNWC", "FCFF", "PV FCFF"
                );
                println!(
                    "{:-<6} {:-^12} {:-^12} {:-^12} {:-^10} {:-^10} {:-^10} {:-^12} {:-^12}",
                    "", "", "", "", "", "", "", "", ""
                );
                for row in &run.discounted.rows {
                    println!(
                        "{:<6} {:>12.1} {:>12.1} {:>12.1} {:>10.1} {:>10.1} {:>10.1} {:>12.1} {:>12.1}",
                        row.year,
                        row.revenue,
                        row.ebit,
                        row.nopat,
                        row.depreciation,
                        row.capex,
                        row.delta_nwc,
                        row.fcff,
                        row.pv_fcff
                    );
                }

                let r = &run.result;
                println!("\nVALUATION:");
                println!("  PV of explicit FCFF:     {:>16.1}", r.pv_explicit);
                println!("  Terminal value:          {:>16.1}", r.terminal_value);
                println!("  PV of terminal value:    {:>16.1}", r.pv_terminal_value);
                println!("  Enterprise value:        {:>16.1}", r.enterprise_value);
                println!("  Equity value:            {:>16.1}", r.equity_value);
                println!("  Shares:                  {:>16.0}", r.shares);
                println!("  Value per share:         {:>16.2}", r.per_share);
                println!("  Terminal share of EV:    {:>15.1}%", r.terminal_share() * 100.0);
                for w in &r.warnings {
                    println!("  Warning: {w}");
                }
                if let (Some(price), Some(up)) = (self.price, self.upside()) {
                    println!("  Market price:            {:>16.2}", price);
                    println!("  Upside:                  {:>+15.1}%", up * 100.0);
                }
            }
            Err(e) => println!("\nVALUATION: unavailable ({e})"),
        }

        match &self.grid {
            Ok(grid) => {
                println!("\nSENSITIVITY (per share; rows terminal growth, columns WACC):");
                print!("{:>8}", "g \\ r");
                for r in &grid.discount_rates {
                    print!(" {:>8.1}%", r * 100.0);
                }
                println!();
                for (g, row) in grid.terminal_growth_rates.iter().zip(grid.values.rows()) {
                    print!("{:>7.1}%", g * 100.0);
                    for v in row {
                        if v.is_finite() {
                            print!(" {v:>9.2}");
                        } else {
                            print!(" {:>9}", "-");
                        }
                    }
                    println!();
                }
                for w in &grid.warnings {
                    println!("  Warning: {w}");
                }
            }
            Err(e) => println!("\nSENSITIVITY: unavailable ({e})"),
        }

        if let Ok(sweeps) = &self.sweeps {
            for s in sweeps {
                if let Some((lo, hi)) = s.value_range() {
                    println!(
                        "  {:<18} {:>7.1}%..{:>5.1}%  ->  {:>9.2} .. {:>9.2}",
                        s.factor.to_string(),
                        s.inputs.iter().next().copied().unwrap_or(f64::NAN) * 100.0,
                        s.inputs.iter().last().copied().unwrap_or(f64::NAN) * 100.0,
                        lo,
                        hi
                    );
                }
            }
        }

        println!(
            "\n--------------------------------------------------------------------------------"
        );
        println!("FOOTBALL FIELD:");
        match &self.football_field {
            Ok(field) => {
                println!("{:<24} {:>12} {:>12}", "Method", "Low", "High");
                println!("{:-<24} {:-^12} {:-^12}", "", "", "");
                for band in &field.bands {
                    println!(
                        "{:<24} {:>12.2} {:>12.2}",
                        band.method.to_string(),
                        band.low(),
                        band.high()
                    );
                }
                for (method, e) in &field.omitted {
                    println!("{:<24} omitted: {e}", method.to_string());
                }
                for w in &field.warnings {
                    println!("  Warning: {w}");
                }
            }
            Err(e) => println!("  unavailable ({e})"),
        }
        println!(
            "================================================================================\n"
        );
    }
}
