//! Stream layer: NDJSON ingestion, cancellation, lifecycle events.
//!
//! The transport driver is compile-time dispatched:
//! - `native` feature → tokio task + mpsc event channel (native.rs)
//! - `wasm` feature → `spawn_local` + callback (wasm.rs)
//!
//! Both run the same [`session::run_session`] over the same
//! [`ingest::ingest`] loop. This module defines the shared state/event types.

pub mod cancel;
pub mod decoder;
pub mod ingest;

#[cfg(feature = "http")]
pub(crate) mod session;

#[cfg(feature = "native")]
pub mod native;

#[cfg(feature = "wasm")]
pub mod wasm;

use crate::domain::tick::Tick;
use crate::error::{SdkError, StreamError};
use crate::network::{DEFAULT_STREAM_URL, DEFAULT_SYMBOLS};
use crate::shared::{subscription_url, Symbol};
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

pub use cancel::CancelToken;
pub use decoder::LineDecoder;
pub use ingest::{ingest, parse_line, IngestReport, LineOutcome, Termination};

// ─── StreamState ─────────────────────────────────────────────────────────────

/// Lifecycle of one stream connection.
///
/// `Idle → Connecting → Streaming → {Completed | Cancelled | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StreamState {
    Idle = 0,
    Connecting = 1,
    Streaming = 2,
    Completed = 3,
    Cancelled = 4,
    Failed = 5,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamState::Completed | StreamState::Cancelled | StreamState::Failed
        )
    }
}

impl From<u8> for StreamState {
    fn from(v: u8) -> Self {
        match v {
            1 => StreamState::Connecting,
            2 => StreamState::Streaming,
            3 => StreamState::Completed,
            4 => StreamState::Cancelled,
            5 => StreamState::Failed,
            _ => StreamState::Idle,
        }
    }
}

/// Shared, lock-free cell holding a [`StreamState`].
///
/// Once a terminal state is stored it never changes again.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl Default for StateCell {
    fn default() -> Self {
        Self(AtomicU8::new(StreamState::Idle as u8))
    }
}

impl StateCell {
    pub fn get(&self) -> StreamState {
        StreamState::from(self.0.load(Ordering::SeqCst))
    }

    /// Move to `next` unless already terminal. Returns whether it moved.
    pub fn transition(&self, next: StreamState) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                if StreamState::from(cur).is_terminal() {
                    None
                } else {
                    Some(next as u8)
                }
            })
            .is_ok()
    }
}

// ─── StreamStats ─────────────────────────────────────────────────────────────

/// Counters for one stream connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Raw bytes received.
    pub bytes: u64,
    /// Complete lines framed, including blank ones.
    pub lines: u64,
    /// Ticks emitted.
    pub ticks: u64,
    /// Lines that were not valid JSON.
    pub malformed: u64,
    /// JSON lines that failed tick validation.
    pub invalid: u64,
}

// ─── StreamEvent ─────────────────────────────────────────────────────────────

/// Events emitted by a stream driver to the consumer.
///
/// Cancellation produces no event: the event source simply ends.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Response headers received; the body is now being read.
    Connected,
    /// A validated tick.
    Tick(Tick),
    /// The server closed the body normally.
    Completed(StreamStats),
    /// The connection could not be opened or broke mid-stream.
    Failed {
        error: StreamError,
        stats: StreamStats,
    },
}

// ─── StreamConfig ────────────────────────────────────────────────────────────

/// Configuration for one stream connection.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Endpoint without the `symbols` query.
    pub url: String,
    pub symbols: Vec<Symbol>,
    /// Fail the stream if no bytes arrive for this long. `None` waits forever.
    pub idle_timeout: Option<Duration>,
    /// TCP connect timeout (native only).
    pub connect_timeout: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| Symbol::from(*s)).collect(),
            idle_timeout: None,
            connect_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl StreamConfig {
    /// Full request URL including one `symbols=` parameter per symbol.
    pub fn request_url(&self) -> String {
        subscription_url(&self.url, &self.symbols)
    }

    pub fn validate(&self) -> Result<(), SdkError> {
        validate_symbols(&self.symbols)?;
        if self.url.trim().is_empty() {
            return Err(SdkError::Validation("Stream URL is empty".into()));
        }
        Ok(())
    }
}

/// Symbols must be a non-empty list of non-blank tokens.
pub fn validate_symbols(symbols: &[Symbol]) -> Result<(), SdkError> {
    if symbols.is_empty() {
        return Err(StreamError::NoSymbols.into());
    }
    if let Some(bad) = symbols
        .iter()
        .find(|s| s.as_str().trim().is_empty() || s.as_str().chars().any(char::is_whitespace))
    {
        return Err(SdkError::Validation(format!("Invalid symbol: {:?}", bad.as_str())));
    }
    Ok(())
}
