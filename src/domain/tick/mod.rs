//! Tick domain: validated per-symbol price updates from the trade stream.

mod convert;
pub mod wire;

use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One validated price update for one trading symbol.
///
/// Produced by the stream ingestor from a [`wire::RawEnvelope`]; consumed
/// immediately by the market table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: Symbol,
    pub price: Decimal,
}

impl Tick {
    pub fn new(symbol: impl Into<Symbol>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}
