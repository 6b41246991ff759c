//! Integration tests against a running trade-stream server.
//!
//! All tests are `#[ignore]` because they require a live endpoint. The URL
//! is read from `TRADE_STREAM_URL` (a `.env` file is honoured) and defaults
//! to the local development server.
//!
//! Run with:
//! ```bash
//! cargo test --test live_stream_integration -- --ignored
//! ```

use std::time::Duration;

use tokio::time::timeout;

use trade_stream_sdk::prelude::*;

const TEST_TIMEOUT: Duration = Duration::from_secs(15);

fn stream_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("TRADE_STREAM_URL").unwrap_or_else(|_| DEFAULT_STREAM_URL.to_string())
}

fn test_client() -> TradeStreamClient {
    TradeStreamClient::builder()
        .stream_url(&stream_url())
        .symbols(DEFAULT_SYMBOLS)
        .idle_timeout(TEST_TIMEOUT)
        .build()
        .expect("valid config")
}

#[tokio::test]
#[ignore]
async fn test_live_connect_and_receive_tick() {
    let mut handle = test_client().connect().expect("spawn should succeed");

    let first = timeout(TEST_TIMEOUT, handle.next_event())
        .await
        .expect("timed out waiting for Connected")
        .expect("event stream ended");
    assert_eq!(first, StreamEvent::Connected, "first event should be Connected");

    let tick = loop {
        let event = timeout(TEST_TIMEOUT, handle.next_event())
            .await
            .expect("timed out waiting for a tick")
            .expect("event stream ended");
        match event {
            StreamEvent::Tick(tick) => break tick,
            StreamEvent::Failed { error, .. } => panic!("stream failed: {}", error),
            _ => {}
        }
    };
    assert!(tick.symbol.is_tradable());
    assert!(DEFAULT_SYMBOLS.contains(&tick.symbol.as_str()));
    println!("{} @ {}", tick.symbol, format_price(tick.price));

    handle.cancel();
    assert_eq!(handle.next_event().await, None);
    assert_eq!(handle.state(), StreamState::Cancelled);
}

#[tokio::test]
#[ignore]
async fn test_live_feed_builds_table() {
    let mut feed = test_client().feed().expect("spawn should succeed");

    timeout(TEST_TIMEOUT, async {
        while feed.store().table().len() < DEFAULT_SYMBOLS.len() {
            if feed.next_batch().await.is_none() {
                break;
            }
        }
    })
    .await
    .expect("timed out waiting for all symbols");

    for row in feed.store().table().iter() {
        println!("{} {}", row.pair_label(), row.display_price());
    }
    assert!(!feed.store().history().is_empty());
    feed.cancel();
    assert_eq!(feed.state(), StreamState::Cancelled);
}
