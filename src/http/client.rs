//! Low-level HTTP client: `StreamHttp`.
//!
//! Opens a streaming GET and hands back the raw body chunks. Framing and
//! validation happen in the stream layer. Internal to the SDK; the stream
//! drivers wrap this.

use crate::error::HttpError;

use futures_util::Stream;
use reqwest::Client;
use std::time::Duration;

const NDJSON_ACCEPT: &str = "application/x-ndjson, application/json;q=0.9, */*;q=0.1";

/// Low-level HTTP client for the trade stream endpoint.
#[derive(Debug, Clone)]
pub struct StreamHttp {
    client: Client,
}

impl StreamHttp {
    /// Build a client. `connect_timeout` bounds the TCP connect only (native);
    /// a running body is never cut off by a total-request timeout.
    pub fn new(connect_timeout: Option<Duration>) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder = builder.pool_max_idle_per_host(2);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = connect_timeout;

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Send the request and return the body as a stream of byte chunks.
    ///
    /// Non-success statuses are mapped to [`HttpError`] before any body byte
    /// is read.
    pub async fn open_stream(
        &self,
        url: &str,
    ) -> Result<impl Stream<Item = Result<impl AsRef<[u8]>, reqwest::Error>>, HttpError> {
        tracing::debug!("Opening trade stream {}", url);
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, NDJSON_ACCEPT)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.bytes_stream());
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

fn map_send_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}
