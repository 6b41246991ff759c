//! Price history state container: app-owned, SDK-provided update logic.

use super::PricePoint;
use crate::domain::market::MarketSnapshot;
use crate::network::{DEFAULT_TRACKED_CURRENCIES, HISTORY_CAPACITY};
use chrono::{DateTime, TimeZone};
use std::collections::VecDeque;
use std::fmt::Display;

/// Rolling chart series for a fixed set of base currencies.
///
/// Holds at most `capacity` points; appending past that evicts the oldest.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    tracked: Vec<String>,
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKED_CURRENCIES.iter().map(|c| c.to_string()))
    }
}

impl PriceHistory {
    pub fn new(tracked: impl IntoIterator<Item = String>) -> Self {
        Self::with_capacity(tracked, HISTORY_CAPACITY)
    }

    pub fn with_capacity(tracked: impl IntoIterator<Item = String>, capacity: usize) -> Self {
        Self {
            tracked: tracked.into_iter().collect(),
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Base currencies this history charts.
    pub fn tracked(&self) -> &[String] {
        &self.tracked
    }

    pub fn is_tracked(&self, base_currency: &str) -> bool {
        self.tracked.iter().any(|c| c == base_currency)
    }

    /// Push a point, evicting from the front until within capacity.
    pub fn push(&mut self, point: PricePoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Derive one point from the current snapshots and append it.
    ///
    /// Each tracked currency takes the price of the first snapshot with that
    /// base currency. Returns `false` without appending when none of the
    /// tracked currencies is present.
    pub fn append_point<'a, Tz>(
        &mut self,
        snapshots: impl IntoIterator<Item = &'a MarketSnapshot>,
        at: DateTime<Tz>,
    ) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut point = PricePoint::new(at.format("%H:%M:%S").to_string());
        for snapshot in snapshots {
            if self.is_tracked(&snapshot.base_currency)
                && !point.prices.contains_key(&snapshot.base_currency)
            {
                point
                    .prices
                    .insert(snapshot.base_currency.clone(), snapshot.current_price);
            }
        }

        if point.prices.is_empty() {
            return false;
        }
        self.push(point);
        true
    }

    /// [`append_point`](Self::append_point) stamped with the local wall clock.
    pub fn append_now<'a>(
        &mut self,
        snapshots: impl IntoIterator<Item = &'a MarketSnapshot>,
    ) -> bool {
        self.append_point(snapshots, chrono::Local::now())
    }

    /// Points oldest-first.
    pub fn points(&self) -> &VecDeque<PricePoint> {
        &self.points
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tick::Tick;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn snapshot(symbol: &str, price: i64) -> MarketSnapshot {
        MarketSnapshot::from_tick(&Tick::new(symbol, Decimal::from(price)))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_append_point_picks_tracked_currencies() {
        let mut history = PriceHistory::default();
        let snaps = vec![
            snapshot("BTCUSDT", 43000),
            snapshot("SOLUSDT", 100),
            snapshot("ETHUSDT", 2200),
        ];
        assert!(history.append_point(&snaps, at(3661)));
        let point = history.latest().unwrap();
        assert_eq!(point.time, "01:01:01");
        assert_eq!(point.price("BTC"), Some(Decimal::from(43000)));
        assert_eq!(point.price("ETH"), Some(Decimal::from(2200)));
        assert_eq!(point.price("SOL"), None);
    }

    #[test]
    fn test_append_point_partial() {
        let mut history = PriceHistory::default();
        assert!(history.append_point(&[snapshot("ETHUSDT", 2200)], at(0)));
        let point = history.latest().unwrap();
        assert_eq!(point.price("BTC"), None);
        assert_eq!(point.price("ETH"), Some(Decimal::from(2200)));
    }

    #[test]
    fn test_append_point_without_tracked_is_skipped() {
        let mut history = PriceHistory::default();
        assert!(!history.append_point(&[snapshot("SOLUSDT", 100)], at(0)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_first_snapshot_per_currency_wins() {
        let mut history = PriceHistory::default();
        let snaps = vec![snapshot("BTCUSDT", 43000), snapshot("BTCEUR", 40000)];
        history.append_point(&snaps, at(0));
        assert_eq!(history.latest().unwrap().price("BTC"), Some(Decimal::from(43000)));
    }

    #[test]
    fn test_bounded_to_fifty_after_seventy_five() {
        let mut history = PriceHistory::default();
        for i in 0..75 {
            history.append_point(&[snapshot("BTCUSDT", i)], at(i));
        }
        assert_eq!(history.len(), 50);
        let prices: Vec<_> = history
            .points()
            .iter()
            .map(|p| p.price("BTC").unwrap())
            .collect();
        let expected: Vec<_> = (25i64..75).map(Decimal::from).collect();
        assert_eq!(prices, expected);
    }

    #[test]
    fn test_custom_capacity_and_tracked() {
        let mut history = PriceHistory::with_capacity(vec!["SOL".to_string()], 2);
        for i in 0..5 {
            history.append_point(&[snapshot("SOLUSDT", i)], at(i));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().price("SOL"), Some(Decimal::from(4)));
        assert_eq!(history.tracked(), ["SOL".to_string()]);
    }
}
