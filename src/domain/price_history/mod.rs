//! Price history domain: bounded chart series derived from the market table.

pub mod state;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use state::PriceHistory;

/// A single chart point: a time label plus one price per tracked base currency.
///
/// Serializes flat, e.g. `{"time":"12:00:01","BTC":"43000","ETH":"2200"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: String,
    #[serde(flatten)]
    pub prices: BTreeMap<String, Decimal>,
}

impl PricePoint {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            prices: BTreeMap::new(),
        }
    }

    /// Price recorded for a base currency in this point.
    pub fn price(&self, currency: &str) -> Option<Decimal> {
        self.prices.get(currency).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_flat() {
        let mut point = PricePoint::new("12:00:01");
        point.prices.insert("BTC".into(), Decimal::from(43000));
        point.prices.insert("ETH".into(), Decimal::from(2200));
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"time": "12:00:01", "BTC": "43000", "ETH": "2200"})
        );
    }
}
