//! High-level client: `TradeStreamClient` and its builder.
//!
//! The client holds configuration only. Stream lifetimes are managed at the
//! application layer (typically tied to a view), so each `connect` returns a
//! fresh handle that the caller owns.

use crate::error::SdkError;
use crate::network::DEFAULT_TRACKED_CURRENCIES;
use crate::shared::Symbol;
use crate::store::MarketStateStore;
use crate::stream::StreamConfig;

use std::time::Duration;

/// The primary entry point for the trade-stream SDK.
#[derive(Debug, Clone)]
pub struct TradeStreamClient {
    config: StreamConfig,
    tracked_currencies: Vec<String>,
}

impl TradeStreamClient {
    pub fn builder() -> TradeStreamClientBuilder {
        TradeStreamClientBuilder::default()
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn tracked_currencies(&self) -> &[String] {
        &self.tracked_currencies
    }

    /// The full `GET` URL the stream will request.
    pub fn subscription_url(&self) -> String {
        self.config.request_url()
    }

    /// An empty store charting this client's tracked currencies.
    pub fn new_store(&self) -> MarketStateStore {
        MarketStateStore::with_tracked(self.tracked_currencies.iter().cloned())
    }

    /// Start streaming on the current tokio runtime.
    #[cfg(feature = "native")]
    pub fn connect(&self) -> Result<crate::stream::native::StreamHandle, SdkError> {
        crate::stream::native::StreamHandle::spawn(self.config.clone())
    }

    /// Start streaming into a fresh store.
    #[cfg(feature = "native")]
    pub fn feed(&self) -> Result<crate::feed::MarketFeed, SdkError> {
        Ok(crate::feed::MarketFeed::new(self.connect()?, self.new_store()))
    }

    /// Start streaming on the browser event loop.
    #[cfg(feature = "wasm")]
    pub fn connect_wasm(
        &self,
        on_event: impl FnMut(crate::stream::StreamEvent) + 'static,
    ) -> Result<crate::stream::wasm::StreamHandle, SdkError> {
        crate::stream::wasm::StreamHandle::spawn(self.config.clone(), on_event)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct TradeStreamClientBuilder {
    config: StreamConfig,
    tracked_currencies: Vec<String>,
}

impl Default for TradeStreamClientBuilder {
    fn default() -> Self {
        Self {
            config: StreamConfig::default(),
            tracked_currencies: DEFAULT_TRACKED_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl TradeStreamClientBuilder {
    pub fn stream_url(mut self, url: &str) -> Self {
        self.config.url = url.to_string();
        self
    }

    pub fn symbols<S: Into<Symbol>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.config.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Fail the stream when no bytes arrive for `timeout`. Off by default.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn tracked_currencies<S: Into<String>>(
        mut self,
        currencies: impl IntoIterator<Item = S>,
    ) -> Self {
        self.tracked_currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<TradeStreamClient, SdkError> {
        self.config.validate()?;
        Ok(TradeStreamClient {
            config: self.config,
            tracked_currencies: self.tracked_currencies,
        })
    }
}
