//! Native stream driver: tokio task + unbounded mpsc event channel.
//!
//! The background task owns the HTTP connection and runs
//! [`run_session`](super::session::run_session). The public handle reads
//! events, reports state, and cancels. Dropping the handle cancels the
//! stream and aborts the task.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::ingest::Termination;
use super::session::run_session;
use super::{StateCell, StreamConfig, StreamEvent, StreamState};
use crate::error::SdkError;
use crate::http::StreamHttp;

/// Handle to one running trade stream.
///
/// Events are delivered in arrival order through [`next_event`](Self::next_event)
/// or [`events`](Self::events). Once [`cancel`](Self::cancel) has been called
/// no further event is returned, even if some were already queued.
pub struct StreamHandle {
    cancel: CancelToken,
    state: Arc<StateCell>,
    event_rx: mpsc::UnboundedReceiver<StreamEvent>,
    task: Option<JoinHandle<Termination>>,
}

impl StreamHandle {
    /// Validate `config` and start streaming on the current tokio runtime.
    ///
    /// Fails without touching the network if the symbol list is empty, or if
    /// called outside a tokio runtime.
    pub fn spawn(config: StreamConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SdkError::Other(format!("Trade stream needs a tokio runtime: {}", e)))?;
        let http = StreamHttp::new(config.connect_timeout)?;

        let cancel = CancelToken::new();
        let state = Arc::new(StateCell::default());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = {
            let cancel = cancel.clone();
            let state = Arc::clone(&state);
            runtime.spawn(async move {
                run_session(&http, &config, &cancel, &state, |event| {
                    event_tx.send(event).is_ok()
                })
                .await
            })
        };

        Ok(Self {
            cancel,
            state,
            event_rx,
            task: Some(task),
        })
    }

    /// Stop the stream. Idempotent; a finished stream keeps its final state.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.state.transition(StreamState::Cancelled);
    }

    /// A token that cancels this stream from elsewhere (another task, a UI
    /// callback). Cancelling through it behaves like [`cancel`](Self::cancel).
    pub fn canceller(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        let state = self.state.get();
        if self.cancel.is_cancelled() && !state.is_terminal() {
            StreamState::Cancelled
        } else {
            state
        }
    }

    /// Wait for the next event. `None` once the stream has ended or been
    /// cancelled.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let event = self.event_rx.recv().await;
        if self.cancel.is_cancelled() {
            return None;
        }
        event
    }

    /// Take an already-queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<StreamEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.event_rx.try_recv().ok()
    }

    /// Events as a `Stream`. Borrows the handle, so drop it before `join`.
    pub fn events(&mut self) -> Pin<Box<dyn Stream<Item = StreamEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(self, |handle| async move {
            handle.next_event().await.map(|event| (event, handle))
        }))
    }

    /// Wait for the background task to finish and return how it ended.
    pub async fn join(mut self) -> Termination {
        match self.task.take() {
            Some(task) => match task.await {
                Ok(termination) => termination,
                Err(e) => {
                    tracing::warn!("Trade stream task ended abnormally: {}", e);
                    Termination::Cancelled
                }
            },
            None => Termination::Cancelled,
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.cancel();
            task.abort();
        }
    }
}
