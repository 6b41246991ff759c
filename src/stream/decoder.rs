//! Incremental NDJSON line framing.
//!
//! Bytes are buffered as received and split on `\n`. A UTF-8 continuation
//! byte can never be `0x0A`, so a multi-byte character split across chunks
//! always lands whole inside one line and decodes correctly once the line is
//! complete. Each line is decoded lossily, so invalid sequences become U+FFFD.

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Streaming line splitter over raw body chunks.
///
/// Private to one connection; the trailing partial line stays buffered until
/// more bytes arrive.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
    /// Start of the first unconsumed line in `buf`.
    start: usize,
    /// Bytes before this offset (relative to `start`) are known newline-free.
    scanned: usize,
    bom_checked: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of body bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.start > 0 && self.start == self.buf.len() {
            self.buf.clear();
            self.start = 0;
        }
        self.buf.extend_from_slice(chunk);
        if !self.bom_checked {
            self.strip_bom();
        }
    }

    /// Take the next complete line (without its `\n`), if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let pending = &self.buf[self.start..];
        match pending[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset;
                let line = String::from_utf8_lossy(&pending[..end]).into_owned();
                self.start += end + 1;
                self.scanned = 0;
                Some(line)
            }
            None => {
                self.scanned = pending.len();
                self.compact();
                None
            }
        }
    }

    /// Bytes of the incomplete trailing line.
    pub fn remainder(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    pub fn is_empty(&self) -> bool {
        self.remainder().is_empty()
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
    }

    fn strip_bom(&mut self) {
        let head = &self.buf[self.start..];
        if head.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(head) {
            return;
        }
        if head.starts_with(UTF8_BOM) {
            self.start += UTF8_BOM.len();
            self.scanned = 0;
        }
        self.bom_checked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(decoder: &mut LineDecoder) -> Vec<String> {
        std::iter::from_fn(|| decoder.next_line()).collect()
    }

    /// Feed `bytes` in pieces cut at `cuts` and collect every framed line.
    fn frame(bytes: &[u8], cuts: &[usize]) -> Vec<String> {
        let mut decoder = LineDecoder::new();
        let mut lines = Vec::new();
        let mut prev = 0;
        let end = bytes.len();
        for &cut in cuts.iter().chain(std::iter::once(&end)) {
            decoder.push(&bytes[prev..cut]);
            lines.extend(drain(&mut decoder));
            prev = cut;
        }
        lines
    }

    #[test]
    fn test_single_chunk_multiple_lines() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"a\nb\nc");
        assert_eq!(drain(&mut decoder), ["a", "b"]);
        assert_eq!(decoder.remainder(), b"c");
        decoder.push(b"\n");
        assert_eq!(drain(&mut decoder), ["c"]);
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_partial_line_waits_for_newline() {
        let mut decoder = LineDecoder::new();
        decoder.push(br#"{"result":{"sym"#);
        assert_eq!(decoder.next_line(), None);
        decoder.push(br#"bol":"BTCUSDT"}}"#);
        assert_eq!(decoder.next_line(), None);
        decoder.push(b"\n");
        assert_eq!(
            decoder.next_line().as_deref(),
            Some(r#"{"result":{"symbol":"BTCUSDT"}}"#)
        );
    }

    #[test]
    fn test_every_split_point_frames_identically() {
        let bytes = "{\"s\":\"€uro\"}\n\n{\"s\":\"日本\"}\r\ntail".as_bytes();
        let whole = frame(bytes, &[]);
        assert_eq!(whole, ["{\"s\":\"€uro\"}", "", "{\"s\":\"日本\"}\r"]);
        for i in 0..=bytes.len() {
            assert_eq!(frame(bytes, &[i]), whole, "split at {}", i);
            for j in i..=bytes.len() {
                assert_eq!(frame(bytes, &[i, j]), whole, "split at {},{}", i, j);
            }
        }
    }

    #[test]
    fn test_byte_at_a_time_multibyte() {
        let bytes = "€\n".as_bytes();
        let cuts: Vec<usize> = (1..bytes.len()).collect();
        assert_eq!(frame(bytes, &cuts), ["€"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"ok\xFF\n");
        assert_eq!(decoder.next_line().as_deref(), Some("ok\u{FFFD}"));
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFa\n\xEF\xBB\xBFb\n";
        for i in 0..=bytes.len() {
            assert_eq!(frame(bytes, &[i]), ["a", "\u{FEFF}b"], "split at {}", i);
        }
    }

    #[test]
    fn test_short_non_bom_start() {
        assert_eq!(frame(b"\n", &[]), [""]);
        assert_eq!(frame(b"\xEFx\n", &[1]), ["\u{FFFD}x"]);
    }
}
