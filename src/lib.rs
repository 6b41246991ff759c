//! # Trade Stream SDK
//!
//! Live NDJSON trade-stream ingestion and market reconciliation for native and
//! WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Symbol newtype, tick validation, market table, price history (always available, WASM-safe)
//! 2. **Ingestion**: Line decoder, cancel token, the generic ingest loop, and the
//!    drivers: tokio task + channel (native) / `spawn_local` + callback (WASM)
//! 3. **HTTP**: `StreamHttp`, a reqwest-based opener for the streaming `GET`
//! 4. **High-Level Client**: `TradeStreamClient`, `MarketStateStore` and `MarketFeed`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trade_stream_sdk::prelude::*;
//!
//! let client = TradeStreamClient::builder()
//!     .stream_url("http://localhost:8081/v1/stream_trades")
//!     .symbols(["BTCUSDT", "ETHUSDT"])
//!     .build()?;
//!
//! let mut feed = client.feed()?;
//! while let Some(_summary) = feed.next_batch().await {
//!     for row in feed.store().table().iter() {
//!         println!("{} {}", row.pair_label(), row.display_price());
//!     }
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and price helpers.
pub mod shared;

/// Domain modules (vertical slices): tick, market, price history.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network and feed constants.
pub mod network;

// ── Layer 2: Ingestion ───────────────────────────────────────────────────────

/// Stream layer: decoding, cancellation, lifecycle, drivers.
pub mod stream;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// HTTP stream transport.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `MarketStateStore`: table plus price history.
pub mod store;

/// `TradeStreamClient`: the primary entry point.
pub mod client;

/// `MarketFeed`: a native stream wired into a store.
#[cfg(feature = "native")]
pub mod feed;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{format_price, parse_decimal, Symbol};

    // Domain types
    pub use crate::domain::market::{Direction, MarketSnapshot, MarketTable, TickOutcome};
    pub use crate::domain::price_history::{PriceHistory, PricePoint};
    pub use crate::domain::tick::Tick;

    // Errors
    pub use crate::error::{HttpError, SdkError, StreamError, TickError};

    // Network
    pub use crate::network::{DEFAULT_STREAM_URL, DEFAULT_SYMBOLS, DEFAULT_TRACKED_CURRENCIES};

    // Stream types
    pub use crate::stream::{
        CancelToken, IngestReport, StreamConfig, StreamEvent, StreamState, StreamStats,
        Termination,
    };

    // State + client
    pub use crate::client::{TradeStreamClient, TradeStreamClientBuilder};
    pub use crate::store::{BatchSummary, MarketStateStore};

    #[cfg(feature = "native")]
    pub use crate::feed::MarketFeed;
    #[cfg(feature = "native")]
    pub use crate::stream::native::StreamHandle;
}
