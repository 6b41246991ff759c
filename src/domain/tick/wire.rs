//! Wire types for the NDJSON trade stream.
//!
//! One JSON object per line: `{"result":{"symbol":"BTCUSDT","price":"43000.12"}}`.
//! Fields are kept as raw JSON values so a missing or mistyped field is
//! reported as an invalid tick rather than a malformed line.

use serde::Deserialize;

/// Outer envelope of a stream line.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    #[serde(default)]
    pub result: Option<RawTrade>,
}

/// The `result` payload of a stream line.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrade {
    #[serde(default)]
    pub symbol: Option<serde_json::Value>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}
