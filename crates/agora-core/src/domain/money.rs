//! Money conversion helpers.
//!
//! Amounts are stored as integer cents. The HTTP surface speaks decimal dollars.

/// Convert a dollar amount to cents, rounding to the nearest cent.
///
/// Returns `None` for negative, non-finite or absurdly large amounts.
#[allow(clippy::cast_possible_truncation)] // bounded by the range check below
pub fn dollars_to_cents(dollars: f64) -> Option<i64> {
    if !dollars.is_finite() || dollars < 0.0 || dollars > 1.0e12 {
        return None;
    }
    Some((dollars * 100.0).round() as i64)
}

/// Convert cents back to dollars for display.
#[allow(clippy::cast_precision_loss)]
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}
