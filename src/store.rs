//! `MarketStateStore`: the market table plus its price history.
//!
//! App-owned, like the domain state containers it wraps. Nothing here fails;
//! bad ticks are skipped and logged by the table.

use crate::domain::market::{Direction, MarketSnapshot, MarketTable, TickOutcome};
use crate::domain::price_history::PriceHistory;
use crate::domain::tick::Tick;
use crate::shared::Symbol;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// What one [`MarketStateStore::apply_batch`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Ticks that inserted or updated a row.
    pub applied: usize,
    /// Ticks skipped for a too-short symbol.
    pub rejected: usize,
    /// Whether a history point was appended for this batch.
    pub history_appended: bool,
}

/// Live market table and its bounded price history.
#[derive(Debug, Clone, Default)]
pub struct MarketStateStore {
    table: MarketTable,
    history: PriceHistory,
}

impl MarketStateStore {
    /// Empty store charting the default currencies (`BTC`, `ETH`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store charting the given base currencies.
    pub fn with_tracked(tracked: impl IntoIterator<Item = String>) -> Self {
        Self {
            table: MarketTable::new(),
            history: PriceHistory::new(tracked),
        }
    }

    /// Upsert one tick into the table. Does not touch the history.
    pub fn apply_tick(&mut self, tick: &Tick) -> TickOutcome {
        self.table.apply_tick(tick)
    }

    /// Apply a batch of ticks in order, then append at most one history point.
    ///
    /// A point is appended only when some applied tick belongs to a tracked
    /// base currency.
    pub fn apply_batch<'a>(&mut self, ticks: impl IntoIterator<Item = &'a Tick>) -> BatchSummary {
        self.apply_batch_at(ticks, chrono::Local::now())
    }

    /// [`apply_batch`](Self::apply_batch) with an explicit timestamp.
    pub fn apply_batch_at<'a, Tz>(
        &mut self,
        ticks: impl IntoIterator<Item = &'a Tick>,
        at: DateTime<Tz>,
    ) -> BatchSummary
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut summary = BatchSummary::default();
        let mut touches_tracked = false;
        for tick in ticks {
            if self.table.apply_tick(tick).is_applied() {
                summary.applied += 1;
                touches_tracked |= self.history.is_tracked(tick.symbol.base());
            } else {
                summary.rejected += 1;
            }
        }

        if touches_tracked {
            summary.history_appended = self.history.append_point(self.table.iter(), at);
        }
        summary
    }

    /// Append a history point from the current table, stamped now.
    pub fn append_history_point(&mut self) -> bool {
        self.history.append_now(self.table.iter())
    }

    /// Append a history point from the current table with an explicit time.
    pub fn append_history_point_at<Tz>(&mut self, at: DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.history.append_point(self.table.iter(), at)
    }

    pub fn table(&self) -> &MarketTable {
        &self.table
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Rows in first-seen order.
    pub fn snapshots(&self) -> Vec<MarketSnapshot> {
        self.table.snapshots()
    }

    pub fn direction(&self, market_id: &Symbol) -> Direction {
        self.table.direction(market_id)
    }

    /// Drop every row and history point.
    pub fn clear(&mut self) {
        self.table.clear();
        self.history.clear();
    }
}
