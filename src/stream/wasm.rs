//! WASM stream driver: `spawn_local` + callback events.
//!
//! The browser's fetch body is read by the same session loop as on native.
//! Events are pushed to an `on_event` callback; the callback is never invoked
//! again once the handle is cancelled or dropped.

use std::rc::Rc;

use super::cancel::CancelToken;
use super::session::run_session;
use super::{StateCell, StreamConfig, StreamEvent, StreamState};
use crate::error::SdkError;
use crate::http::StreamHttp;

/// Handle to one running trade stream on the browser event loop.
///
/// Dropping the handle cancels the stream.
pub struct StreamHandle {
    cancel: CancelToken,
    state: Rc<StateCell>,
}

impl StreamHandle {
    /// Validate `config` and start streaming. `on_event` receives every
    /// lifecycle event and tick in arrival order.
    pub fn spawn(
        config: StreamConfig,
        mut on_event: impl FnMut(StreamEvent) + 'static,
    ) -> Result<Self, SdkError> {
        config.validate()?;
        let http = StreamHttp::new(config.connect_timeout)?;

        let cancel = CancelToken::new();
        let state = Rc::new(StateCell::default());

        {
            let cancel = cancel.clone();
            let state = Rc::clone(&state);
            wasm_bindgen_futures::spawn_local(async move {
                let gate = cancel.clone();
                run_session(&http, &config, &cancel, &state, move |event| {
                    if gate.is_cancelled() {
                        return false;
                    }
                    on_event(event);
                    true
                })
                .await;
            });
        }

        Ok(Self { cancel, state })
    }

    /// Stop the stream. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.state.transition(StreamState::Cancelled);
    }

    pub fn canceller(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn state(&self) -> StreamState {
        let state = self.state.get();
        if self.cancel.is_cancelled() && !state.is_terminal() {
            StreamState::Cancelled
        } else {
            state
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
