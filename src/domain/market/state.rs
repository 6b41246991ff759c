//! Market table state container: app-owned, SDK-provided update logic.

use super::{Direction, MarketSnapshot};
use crate::domain::tick::Tick;
use crate::shared::Symbol;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// What [`MarketTable::apply_tick`] did with a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First tick for the symbol; a row was appended at `index`.
    Inserted { index: usize },
    /// Known symbol; the price at `index` was replaced in place.
    Updated { index: usize },
    /// The symbol is too short to be a market. Nothing changed.
    Rejected,
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, TickOutcome::Rejected)
    }
}

/// Insertion-ordered table of market snapshots, keyed by `market_id`.
///
/// Rows keep the position of the first tick seen for their symbol; later
/// ticks only replace `current_price`. Alongside the rows the table keeps the
/// price each market had before its latest update, for direction indicators.
///
/// The app owns instances of this type. The SDK provides the update methods.
#[derive(Debug, Clone, Default)]
pub struct MarketTable {
    markets: IndexMap<Symbol, MarketSnapshot>,
    previous_prices: HashMap<Symbol, Decimal>,
}

impl MarketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a tick: update in place if the symbol is known, else append.
    pub fn apply_tick(&mut self, tick: &Tick) -> TickOutcome {
        if !tick.symbol.is_tradable() {
            tracing::warn!(symbol = %tick.symbol, "Symbol too short, tick skipped");
            return TickOutcome::Rejected;
        }

        if let Some((index, _, snapshot)) = self.markets.get_full_mut(&tick.symbol) {
            self.previous_prices
                .insert(tick.symbol.clone(), snapshot.current_price);
            snapshot.current_price = tick.price;
            return TickOutcome::Updated { index };
        }

        let (index, _) = self
            .markets
            .insert_full(tick.symbol.clone(), MarketSnapshot::from_tick(tick));
        tracing::debug!(symbol = %tick.symbol, index, "New market");
        TickOutcome::Inserted { index }
    }

    pub fn get(&self, market_id: &Symbol) -> Option<&MarketSnapshot> {
        self.markets.get(market_id)
    }

    /// Row position of a market, in first-seen order.
    pub fn position(&self, market_id: &Symbol) -> Option<usize> {
        self.markets.get_index_of(market_id)
    }

    /// Snapshots in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &MarketSnapshot> {
        self.markets.values()
    }

    /// Owned copy of all rows, in first-seen order.
    pub fn snapshots(&self) -> Vec<MarketSnapshot> {
        self.markets.values().cloned().collect()
    }

    /// Price the market had before its latest update, if it has been updated.
    pub fn previous_price(&self, market_id: &Symbol) -> Option<Decimal> {
        self.previous_prices.get(market_id).copied()
    }

    /// Movement of the latest update relative to the one before it.
    pub fn direction(&self, market_id: &Symbol) -> Direction {
        match self.markets.get(market_id) {
            Some(snapshot) => {
                Direction::between(self.previous_price(market_id), snapshot.current_price)
            }
            None => Direction::Unchanged,
        }
    }

    /// First market whose base currency matches, e.g. `"BTC"` → `BTCUSDT`.
    pub fn by_base_currency(&self, base: &str) -> Option<&MarketSnapshot> {
        self.markets.values().find(|m| m.base_currency == base)
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn clear(&mut self) {
        self.markets.clear();
        self.previous_prices.clear();
    }
}
