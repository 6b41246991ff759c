//! One connection lifecycle, shared by the native and WASM drivers.

use super::cancel::CancelToken;
use super::ingest::{ingest, Termination};
use super::{StateCell, StreamConfig, StreamEvent, StreamState, StreamStats};
use crate::error::StreamError;
use crate::http::StreamHttp;

use futures_util::future::{select, Either};
use futures_util::pin_mut;

/// Open the stream, ingest it, and emit lifecycle events through `emit`.
///
/// `emit` returning `false` means the consumer is gone; the session then ends
/// as cancelled. No event is emitted after cancellation.
pub(crate) async fn run_session(
    http: &StreamHttp,
    config: &StreamConfig,
    cancel: &CancelToken,
    state: &StateCell,
    mut emit: impl FnMut(StreamEvent) -> bool,
) -> Termination {
    if !state.transition(StreamState::Connecting) {
        return Termination::Cancelled;
    }

    let url = config.request_url();
    let open = http.open_stream(&url);
    pin_mut!(open);
    let body = match select(cancel.cancelled(), open).await {
        Either::Left(_) => return finish(state, Termination::Cancelled, StreamStats::default()),
        Either::Right((Ok(body), _)) => body,
        Either::Right((Err(e), _)) => {
            let error = StreamError::from(e);
            tracing::error!("Trade stream connection failed: {}", error);
            if !cancel.is_cancelled() {
                emit(StreamEvent::Failed {
                    error: error.clone(),
                    stats: StreamStats::default(),
                });
            }
            return finish(state, Termination::Failed(error), StreamStats::default());
        }
    };

    if cancel.is_cancelled() || !state.transition(StreamState::Streaming) {
        return finish(state, Termination::Cancelled, StreamStats::default());
    }
    tracing::info!(symbols = config.symbols.len(), "Trade stream connected");
    if !emit(StreamEvent::Connected) {
        return finish(state, Termination::Cancelled, StreamStats::default());
    }

    let report = ingest(body, cancel, config.idle_timeout, |tick| {
        emit(StreamEvent::Tick(tick))
    })
    .await;

    match &report.termination {
        Termination::Completed if !cancel.is_cancelled() => {
            emit(StreamEvent::Completed(report.stats));
        }
        Termination::Failed(error) if !cancel.is_cancelled() => {
            tracing::error!("Trade stream failed: {}", error);
            emit(StreamEvent::Failed {
                error: error.clone(),
                stats: report.stats,
            });
        }
        _ => {}
    }

    // A cancel that lands while the final event is being built still wins.
    let termination = if cancel.is_cancelled() {
        Termination::Cancelled
    } else {
        report.termination
    };
    finish(state, termination, report.stats)
}

fn finish(state: &StateCell, termination: Termination, stats: StreamStats) -> Termination {
    let next = match &termination {
        Termination::Completed => StreamState::Completed,
        Termination::Cancelled => StreamState::Cancelled,
        Termination::Failed(_) => StreamState::Failed,
    };
    state.transition(next);
    match &termination {
        Termination::Completed => tracing::info!(
            ticks = stats.ticks,
            bytes = stats.bytes,
            "Trade stream completed"
        ),
        Termination::Cancelled => tracing::info!(ticks = stats.ticks, "Trade stream cancelled"),
        Termination::Failed(_) => {}
    }
    termination
}
