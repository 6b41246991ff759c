//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the stream sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod price;

pub use price::{format_price, parse_decimal};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Minimum length (in characters) of a tradable symbol.
pub const MIN_SYMBOL_LEN: usize = 6;

/// Number of leading characters that make up the base currency.
pub const BASE_CURRENCY_LEN: usize = 3;

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// Newtype for exchange trading-pair identifiers (e.g. `"BTCUSDT"`).
///
/// Doubles as the `market_id` of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the symbol is long enough to split into base + quote.
    pub fn is_tradable(&self) -> bool {
        self.char_len() >= MIN_SYMBOL_LEN
    }

    /// Split into `(base, quote)`: the first three characters and the rest.
    pub fn split_pair(&self) -> (&str, &str) {
        let cut = self
            .0
            .char_indices()
            .nth(BASE_CURRENCY_LEN)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        self.0.split_at(cut)
    }

    /// Base currency code, e.g. `"BTC"` for `"BTCUSDT"`.
    pub fn base(&self) -> &str {
        self.split_pair().0
    }

    /// Quote currency code, e.g. `"USDT"` for `"BTCUSDT"`.
    pub fn quote(&self) -> &str {
        self.split_pair().1
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol(s.to_string()))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol(s))
    }
}

// ─── Utilities ───────────────────────────────────────────────────────────────

/// Build the subscription URL: `{endpoint}?symbols=s1&symbols=s2...`.
///
/// Each symbol is percent-encoded on its own. An endpoint that already has a
/// query string gets the symbols appended with `&`.
pub fn subscription_url(endpoint: &str, symbols: &[Symbol]) -> String {
    let query = symbols
        .iter()
        .map(|s| format!("symbols={}", urlencoding::encode(s.as_str())))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        return endpoint.to_string();
    }
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}{}", endpoint, sep, query)
}
