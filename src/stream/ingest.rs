//! The ingest loop: body chunks → framed lines → validated ticks.
//!
//! Generic over any `Stream` of byte chunks so the same loop runs behind
//! reqwest on native and WASM, and directly over in-memory streams in tests.

use super::cancel::CancelToken;
use super::decoder::LineDecoder;
use super::StreamStats;
use crate::domain::tick::wire::RawEnvelope;
use crate::domain::tick::Tick;
use crate::error::{StreamError, TickError};

use futures_util::future::{select, Either};
use futures_util::{pin_mut, Stream, StreamExt};
use futures_timer::Delay;
use std::fmt::Display;
use std::time::Duration;

// ─── Line processing ─────────────────────────────────────────────────────────

/// Result of processing one framed line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank after trimming.
    Empty,
    /// Not valid JSON (or not an object with an object `result`).
    Malformed(serde_json::Error),
    /// Valid JSON that is not a valid tick.
    Invalid(TickError),
    Tick(Tick),
}

/// Trim, parse and validate one line.
pub fn parse_line(line: &str) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Empty;
    }
    let envelope = match serde_json::from_str::<RawEnvelope>(line) {
        Ok(envelope) => envelope,
        Err(e) => return LineOutcome::Malformed(e),
    };
    match Tick::try_from(envelope) {
        Ok(tick) => LineOutcome::Tick(tick),
        Err(e) => LineOutcome::Invalid(e),
    }
}

// ─── Ingest loop ─────────────────────────────────────────────────────────────

/// How an ingest loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The body ended.
    Completed,
    /// The token was cancelled, or the tick consumer went away.
    Cancelled,
    /// Read failure or idle timeout.
    Failed(StreamError),
}

/// Terminal outcome plus counters of one ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub termination: Termination,
    pub stats: StreamStats,
}

enum Read<T> {
    Chunk(T),
    End,
    Idle,
}

async fn read_next<S>(body: &mut S, idle_timeout: Option<Duration>) -> Read<S::Item>
where
    S: Stream + Unpin,
{
    let Some(limit) = idle_timeout else {
        return match body.next().await {
            Some(item) => Read::Chunk(item),
            None => Read::End,
        };
    };
    match select(body.next(), Delay::new(limit)).await {
        Either::Left((Some(item), _)) => Read::Chunk(item),
        Either::Left((None, _)) => Read::End,
        Either::Right(_) => Read::Idle,
    }
}

/// Drive `body` to completion, handing each valid tick to `on_tick`.
///
/// Lines are processed strictly in arrival order, one at a time. Malformed
/// lines and invalid ticks are logged and skipped. Cancellation is checked
/// before every read and before every tick, so nothing reaches `on_tick`
/// once `cancel` fires. `on_tick` returning `false` means the consumer is
/// gone and ends the loop as cancelled.
pub async fn ingest<S, B, E>(
    body: S,
    cancel: &CancelToken,
    idle_timeout: Option<Duration>,
    mut on_tick: impl FnMut(Tick) -> bool,
) -> IngestReport
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    pin_mut!(body);
    let mut decoder = LineDecoder::new();
    let mut stats = StreamStats::default();

    let termination = 'read: loop {
        if cancel.is_cancelled() {
            break Termination::Cancelled;
        }

        let read = read_next(&mut body, idle_timeout);
        pin_mut!(read);
        let read = match select(cancel.cancelled(), read).await {
            Either::Left(_) => break Termination::Cancelled,
            Either::Right((read, _)) => read,
        };

        let chunk = match read {
            Read::Chunk(Ok(chunk)) => chunk,
            Read::Chunk(Err(e)) => {
                if cancel.is_cancelled() {
                    break Termination::Cancelled;
                }
                break Termination::Failed(StreamError::Transport(e.to_string()));
            }
            Read::End => {
                if !decoder.is_empty() {
                    tracing::debug!(
                        bytes = decoder.remainder().len(),
                        "Stream ended with an unterminated line; discarded"
                    );
                }
                break Termination::Completed;
            }
            Read::Idle => {
                let idle_ms = idle_timeout.map(|d| d.as_millis() as u64).unwrap_or_default();
                break Termination::Failed(StreamError::Idle { idle_ms });
            }
        };

        let bytes = chunk.as_ref();
        stats.bytes += bytes.len() as u64;
        decoder.push(bytes);

        while let Some(line) = decoder.next_line() {
            if cancel.is_cancelled() {
                break 'read Termination::Cancelled;
            }
            stats.lines += 1;
            match parse_line(&line) {
                LineOutcome::Empty => {}
                LineOutcome::Malformed(e) => {
                    stats.malformed += 1;
                    tracing::warn!("Stream line is not valid JSON: {} (raw: {})", e, line.trim());
                }
                LineOutcome::Invalid(e) => {
                    stats.invalid += 1;
                    tracing::warn!("Skipping invalid tick: {}", e);
                }
                LineOutcome::Tick(tick) => {
                    tracing::trace!(symbol = %tick.symbol, price = %tick.price, "Tick");
                    stats.ticks += 1;
                    if !on_tick(tick) {
                        tracing::debug!("Tick consumer dropped, stopping stream");
                        break 'read Termination::Cancelled;
                    }
                }
            }
        }
    };

    IngestReport { termination, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use rust_decimal::Decimal;
    use std::convert::Infallible;

    const TWO_LINES: &str = concat!(
        r#"{"result":{"symbol":"BTCUSDT","price":"43000"}}"#,
        "\n",
        r#"{"result":{"symbol":"ETHUSDT","price":"2200"}}"#,
        "\n"
    );

    fn chunks(parts: &[&[u8]]) -> impl Stream<Item = Result<Vec<u8>, Infallible>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(p.to_vec()))
                .collect::<Vec<_>>(),
        )
    }

    fn run(body: impl Stream<Item = Result<Vec<u8>, Infallible>>) -> (Vec<Tick>, IngestReport) {
        let mut ticks = Vec::new();
        let cancel = CancelToken::new();
        let report = tokio_test::block_on(ingest(body, &cancel, None, |t| {
            ticks.push(t);
            true
        }));
        (ticks, report)
    }

    fn symbols(ticks: &[Tick]) -> Vec<&str> {
        ticks.iter().map(|t| t.symbol.as_str()).collect()
    }

    #[test]
    fn test_parse_line_outcomes() {
        assert!(matches!(parse_line("   "), LineOutcome::Empty));
        assert!(matches!(parse_line("{oops"), LineOutcome::Malformed(_)));
        assert!(matches!(parse_line("[1,2]"), LineOutcome::Malformed(_)));
        assert!(matches!(
            parse_line(r#"{"result":{"symbol":"BTC","price":"1"}}"#),
            LineOutcome::Invalid(TickError::SymbolTooShort(_))
        ));
        assert!(matches!(
            parse_line(r#"{"result":{"symbol":"BTCUSDT","price":"not-a-number"}}"#),
            LineOutcome::Invalid(TickError::InvalidPrice(_))
        ));
        match parse_line(" {\"result\":{\"symbol\":\"BTCUSDT\",\"price\":\"43000.12\"}}\r") {
            LineOutcome::Tick(t) => assert_eq!(t.price.to_string(), "43000.12"),
            other => panic!("expected tick, got {:?}", other),
        }
    }

    #[test]
    fn test_split_between_lines() {
        let (first, second) = TWO_LINES.split_at(TWO_LINES.find('\n').unwrap() + 1);
        let (ticks, report) = run(chunks(&[first.as_bytes(), second.as_bytes()]));
        assert_eq!(symbols(&ticks), ["BTCUSDT", "ETHUSDT"]);
        assert_eq!(ticks[0].price, Decimal::from(43000));
        assert_eq!(ticks[1].price, Decimal::from(2200));
        assert_eq!(report.termination, Termination::Completed);
        assert_eq!(report.stats.ticks, 2);
        assert_eq!(report.stats.bytes, TWO_LINES.len() as u64);
    }

    #[test]
    fn test_split_mid_first_line() {
        let cut = TWO_LINES.find(r#"bol""#).unwrap();
        let (a, b) = TWO_LINES.as_bytes().split_at(cut);
        let (ticks, _) = run(chunks(&[a, b]));
        assert_eq!(symbols(&ticks), ["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_any_chunking_yields_same_ticks() {
        let body = concat!(
            r#"{"result":{"symbol":"BTCUSDT","price":"43000"}}"#,
            "\n\n",
            r#"{"result":{"symbol":"ÉTHUSD","price":"2200.5"}}"#,
            "\n"
        )
        .as_bytes();
        let (whole, _) = run(chunks(&[body]));
        assert_eq!(whole.len(), 2);
        for i in 0..=body.len() {
            let (a, b) = body.split_at(i);
            let (ticks, _) = run(chunks(&[a, b]));
            assert_eq!(ticks, whole, "split at {}", i);
        }
        let bytewise: Vec<&[u8]> = body.chunks(1).collect();
        assert_eq!(run(chunks(&bytewise)).0, whole);
    }

    #[test]
    fn test_bad_lines_are_skipped_not_fatal() {
        let body = concat!(
            "not json\n",
            r#"{"result":{"symbol":"BTC","price":"1"}}"#,
            "\n",
            r#"{"result":{"symbol":"BTCUSDT","price":"not-a-number"}}"#,
            "\n",
            r#"{"nothing":true}"#,
            "\n",
            r#"{"result":{"symbol":"ETHUSDT","price":"2200"}}"#,
            "\n"
        );
        let (ticks, report) = run(chunks(&[body.as_bytes()]));
        assert_eq!(symbols(&ticks), ["ETHUSDT"]);
        assert_eq!(report.termination, Termination::Completed);
        assert_eq!(report.stats.lines, 5);
        assert_eq!(report.stats.malformed, 1);
        assert_eq!(report.stats.invalid, 3);
    }

    #[test]
    fn test_unterminated_tail_is_not_emitted() {
        let body = concat!(
            r#"{"result":{"symbol":"BTCUSDT","price":"1"}}"#,
            "\n",
            r#"{"result":{"symbol":"ETHUSDT","price":"2"}}"#
        );
        let (ticks, report) = run(chunks(&[body.as_bytes()]));
        assert_eq!(symbols(&ticks), ["BTCUSDT"]);
        assert_eq!(report.termination, Termination::Completed);
    }

    #[test]
    fn test_read_error_fails_stream() {
        let body = stream::iter(vec![
            Ok(TWO_LINES.as_bytes().to_vec()),
            Err("connection reset"),
        ]);
        let cancel = CancelToken::new();
        let mut count = 0;
        let report = tokio_test::block_on(ingest(body, &cancel, None, |_| {
            count += 1;
            true
        }));
        assert_eq!(count, 2);
        assert_eq!(
            report.termination,
            Termination::Failed(StreamError::Transport("connection reset".into()))
        );
    }

    #[test]
    fn test_no_ticks_after_cancel_within_a_chunk() {
        let cancel = CancelToken::new();
        let mut seen = Vec::new();
        let report = tokio_test::block_on(ingest(
            chunks(&[TWO_LINES.as_bytes()]),
            &cancel,
            None,
            |t| {
                seen.push(t);
                cancel.cancel();
                true
            },
        ));
        assert_eq!(symbols(&seen), ["BTCUSDT"]);
        assert_eq!(report.termination, Termination::Cancelled);
    }

    #[test]
    fn test_already_cancelled_reads_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut count = 0;
        let report = tokio_test::block_on(ingest(
            chunks(&[TWO_LINES.as_bytes()]),
            &cancel,
            None,
            |_| {
                count += 1;
                true
            },
        ));
        assert_eq!(count, 0);
        assert_eq!(report.stats.bytes, 0);
        assert_eq!(report.termination, Termination::Cancelled);
    }

    #[test]
    fn test_consumer_gone_stops_stream() {
        let cancel = CancelToken::new();
        let report = tokio_test::block_on(ingest(
            chunks(&[TWO_LINES.as_bytes()]),
            &cancel,
            None,
            |_| false,
        ));
        assert_eq!(report.termination, Termination::Cancelled);
        assert_eq!(report.stats.ticks, 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_read() {
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            remote.cancel();
        });
        let body = stream::pending::<Result<Vec<u8>, Infallible>>();
        let report = tokio::time::timeout(
            Duration::from_secs(2),
            ingest(body, &cancel, None, |_| true),
        )
        .await
        .expect("cancel should end the loop");
        assert_eq!(report.termination, Termination::Cancelled);
    }

    #[tokio::test]
    async fn test_idle_timeout_fails_stream() {
        let cancel = CancelToken::new();
        let body = stream::iter(vec![Ok::<_, Infallible>(TWO_LINES.as_bytes().to_vec())])
            .chain(stream::pending());
        let mut count = 0;
        let report = ingest(body, &cancel, Some(Duration::from_millis(30)), |_| {
            count += 1;
            true
        })
        .await;
        assert_eq!(count, 2);
        assert_eq!(
            report.termination,
            Termination::Failed(StreamError::Idle { idle_ms: 30 })
        );
    }
}
