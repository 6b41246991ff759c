//! Network and feed constants for the trade-stream SDK.

/// Default NDJSON trade-stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "http://localhost:8081/v1/stream_trades";

/// Symbols subscribed when the caller does not supply any.
pub const DEFAULT_SYMBOLS: [&str; 2] = ["BTCUSDT", "ETHUSDT"];

/// Base currencies charted by the price history.
pub const DEFAULT_TRACKED_CURRENCIES: [&str; 2] = ["BTC", "ETH"];

/// Maximum number of points kept in a price history.
pub const HISTORY_CAPACITY: usize = 50;
