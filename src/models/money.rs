//! Amount handling and rounding policy
//!
//! Amounts are plain `f64` currency units. Two rounding boundaries exist:
//! presentation values are rounded to 2 decimals, the water-filling solver
//! rounds its cap to 6 decimals so closed-goal caps do not lose precision
//! before they are applied.

/// Round a money value for presentation (2 decimal places)
pub fn round_money(value: f64) -> f64 {
    round_to(value, 100.0)
}

/// Round a value produced by the cap solver (6 decimal places)
pub fn round_solver_precision(value: f64) -> f64 {
    round_to(value, 1_000_000.0)
}

fn round_to(value: f64, scale: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value + f64::EPSILON) * scale).round() / scale
}

/// Treat non-finite or negative amounts as absent
///
/// Returns `None` for NaN, infinities and values below zero. Zero is kept.
pub fn sanitize_amount(value: f64) -> Option<f64> {
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Sanitize to a non-negative amount, defaulting to zero
pub fn amount_or_zero(value: f64) -> f64 {
    sanitize_amount(value).unwrap_or(0.0)
}

/// Check if an amount is a usable positive contribution
pub fn is_positive_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Format an amount with two decimals and an optional currency symbol
pub fn format_amount(value: f64, symbol: &str) -> String {
    let rounded = round_money(value);
    if rounded < 0.0 {
        format!("-{}{:.2}", symbol, -rounded)
    } else {
        // abs() drops the sign of -0.0
        format!("{}{:.2}", symbol, rounded.abs())
    }
}
