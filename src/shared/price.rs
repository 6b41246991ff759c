//! Price parsing and display helpers.
//!
//! Prices travel as decimal strings and are held as `rust_decimal::Decimal`,
//! which has no NaN or infinity, so a parsed price is always finite.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal price string such as `"43000.12"` or `"4.3e4"`.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not
/// a number.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Format a price for a table cell: two decimal places, rounded half away from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded =
        price.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
