//! Conversions from wire types to validated ticks.

use super::wire::{RawEnvelope, RawTrade};
use super::Tick;
use crate::error::TickError;
use crate::shared::{parse_decimal, Symbol};
use serde_json::Value;

impl TryFrom<RawEnvelope> for Tick {
    type Error = TickError;

    fn try_from(envelope: RawEnvelope) -> Result<Self, Self::Error> {
        envelope
            .result
            .ok_or(TickError::MissingResult)
            .and_then(Tick::try_from)
    }
}

impl TryFrom<RawTrade> for Tick {
    type Error = TickError;

    fn try_from(trade: RawTrade) -> Result<Self, Self::Error> {
        let symbol = match trade.symbol {
            Some(Value::String(s)) if !s.is_empty() => Symbol::from(s),
            other => return Err(TickError::InvalidSymbol(describe(other.as_ref()))),
        };

        if !symbol.is_tradable() {
            return Err(TickError::SymbolTooShort(symbol.to_string()));
        }

        // The stream sends strings, but a bare JSON number is accepted too.
        let price = match &trade.price {
            Some(Value::String(s)) => parse_decimal(s),
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            _ => None,
        }
        .ok_or_else(|| TickError::InvalidPrice(describe(trade.price.as_ref())))?;

        Ok(Tick { symbol, price })
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => "<missing>".to_string(),
    }
}
