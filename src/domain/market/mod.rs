//! Market domain: per-symbol snapshots and the live market table.

pub mod state;

use crate::domain::tick::Tick;
use crate::shared::{format_price, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use state::{MarketTable, TickOutcome};

// ─── MarketSnapshot ──────────────────────────────────────────────────────────

/// Latest known state of a single market.
///
/// `market_id` is the symbol and never changes once the row exists; only
/// `current_price` is replaced by later ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub market_id: Symbol,
    pub base_currency: String,
    pub quote_currency: String,
    pub current_price: Decimal,
}

impl MarketSnapshot {
    /// Build the first snapshot for a symbol from its first tick.
    pub fn from_tick(tick: &Tick) -> Self {
        let (base, quote) = tick.symbol.split_pair();
        Self {
            market_id: tick.symbol.clone(),
            base_currency: base.to_string(),
            quote_currency: quote.to_string(),
            current_price: tick.price,
        }
    }

    /// `"BTC/USDT"`.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.base_currency, self.quote_currency)
    }

    /// Price rendered with two decimal places.
    pub fn display_price(&self) -> String {
        format_price(self.current_price)
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

/// Price movement of a market relative to its previous price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Unchanged,
}

impl Direction {
    pub fn between(previous: Option<Decimal>, current: Decimal) -> Self {
        match previous {
            Some(prev) if current > prev => Direction::Up,
            Some(prev) if current < prev => Direction::Down,
            _ => Direction::Unchanged,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Unchanged => write!(f, "unchanged"),
        }
    }
}
