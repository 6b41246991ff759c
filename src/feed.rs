//! `MarketFeed`: a running stream wired into a `MarketStateStore`.
//!
//! The native counterpart of a dashboard view: it owns the connection and the
//! state it feeds. Dropping the feed cancels the stream.

use crate::domain::tick::Tick;
use crate::stream::native::StreamHandle;
use crate::stream::{StreamEvent, StreamState};
use crate::store::{BatchSummary, MarketStateStore};

/// Owns one stream and the store its ticks are applied to.
pub struct MarketFeed {
    handle: StreamHandle,
    store: MarketStateStore,
    outcome: Option<StreamEvent>,
}

impl MarketFeed {
    pub fn new(handle: StreamHandle, store: MarketStateStore) -> Self {
        Self {
            handle,
            store,
            outcome: None,
        }
    }

    /// Wait for at least one event, drain whatever else is already queued,
    /// and apply the ticks among them as one batch.
    ///
    /// Returns `None` once the stream has ended or been cancelled. A
    /// `Completed` or `Failed` event is kept in [`outcome`](Self::outcome).
    pub async fn next_batch(&mut self) -> Option<BatchSummary> {
        let first = self.handle.next_event().await?;
        let mut ticks: Vec<Tick> = Vec::new();
        let mut next = Some(first);
        while let Some(event) = next.take() {
            match event {
                StreamEvent::Tick(tick) => ticks.push(tick),
                StreamEvent::Connected => {}
                terminal @ (StreamEvent::Completed(_) | StreamEvent::Failed { .. }) => {
                    self.outcome = Some(terminal);
                    break;
                }
            }
            next = self.handle.try_next_event();
        }

        if ticks.is_empty() {
            return Some(BatchSummary::default());
        }
        let summary = self.store.apply_batch(&ticks);
        tracing::debug!(
            applied = summary.applied,
            rejected = summary.rejected,
            "Applied tick batch"
        );
        Some(summary)
    }

    /// Apply batches until the stream ends. Returns the number of batches.
    pub async fn run_to_end(&mut self) -> usize {
        let mut batches = 0;
        while self.next_batch().await.is_some() {
            batches += 1;
        }
        batches
    }

    pub fn store(&self) -> &MarketStateStore {
        &self.store
    }

    /// The terminal event, once the stream has completed or failed.
    pub fn outcome(&self) -> Option<&StreamEvent> {
        self.outcome.as_ref()
    }

    pub fn state(&self) -> StreamState {
        self.handle.state()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn handle(&self) -> &StreamHandle {
        &self.handle
    }
}
