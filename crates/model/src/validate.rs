//! Domain checks on assumptions.

use fairvalue_primitives::Assumptions;

use crate::ModelError;

/// Sane domains for assumption values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationBounds {
    /// Longest accepted projection horizon, in years.
    pub max_horizon: u32,
    /// Accepted EBIT margin range.
    pub ebit_margin: (f64, f64),
    /// Accepted tax rate range.
    pub tax_rate: (f64, f64),
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self { max_horizon: 50, ebit_margin: (-1.0, 1.0), tax_rate: (0.0, 1.0) }
    }
}

impl ValidationBounds {
    /// Check every assumption against these bounds.
    ///
    /// `discount_rate <= terminal_growth` is not rejected here; the
    /// discounting stage reports it as an undefined terminal value.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAssumption` naming the first offending field.
    pub fn check(&self, a: &Assumptions) -> Result<(), ModelError> {
        if a.horizon < 1 {
            return Err(invalid("horizon must be at least 1 year"));
        }
        if a.horizon > self.max_horizon {
            return Err(invalid(format!(
                "horizon {} exceeds maximum of {} years",
                a.horizon, self.max_horizon
            )));
        }

        within("tax rate", a.tax_rate, self.tax_rate)?;
        above_minus_one("discount rate", a.discount_rate)?;
        above_minus_one("terminal growth", a.terminal_growth)?;

        if let Some(g) = a.revenue_growth {
            above_minus_one("revenue growth", g)?;
        }
        if let Some(m) = a.ebit_margin {
            within("EBIT margin", m, self.ebit_margin)?;
        }
        if let Some(d) = a.depreciation_pct {
            non_negative("depreciation ratio", d)?;
        }
        if let Some(c) = a.capex_pct {
            non_negative("capex ratio", c)?;
        }
        if let Some(f) = a.fixed_assets_pct {
            non_negative("fixed assets ratio", f)?;
        }
        if let Some(n) = a.nwc_pct {
            finite("NWC ratio", n)?;
        }
        if let Some(s) = a.shares_override {
            if !(s.is_finite() && s > 0.0) {
                return Err(invalid(format!("share override must be positive, got {s}")));
            }
        }
        Ok(())
    }
}

/// Check `a` against the default bounds.
///
/// # Errors
/// Returns `ModelError::InvalidAssumption` naming the first offending field.
pub fn validate(a: &Assumptions) -> Result<(), ModelError> {
    ValidationBounds::default().check(a)
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::InvalidAssumption(msg.into())
}

fn finite(name: &str, v: f64) -> Result<(), ModelError> {
    if v.is_finite() { Ok(()) } else { Err(invalid(format!("{name} must be finite, got {v}"))) }
}

fn non_negative(name: &str, v: f64) -> Result<(), ModelError> {
    finite(name, v)?;
    if v < 0.0 {
        return Err(invalid(format!("{name} must be non-negative, got {v}")));
    }
    Ok(())
}

fn above_minus_one(name: &str, v: f64) -> Result<(), ModelError> {
    finite(name, v)?;
    if v <= -1.0 {
        return Err(invalid(format!("{name} must be above -100%, got {v}")));
    }
    Ok(())
}

fn within(name: &str, v: f64, (lo, hi): (f64, f64)) -> Result<(), ModelError> {
    finite(name, v)?;
    if v < lo || v > hi {
        return Err(invalid(format!("{name} {v} outside [{lo}, {hi}]")));
    }
    Ok(())
}
