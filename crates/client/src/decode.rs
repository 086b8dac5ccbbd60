//! Incremental newline-delimited line decoding.
//!
//! The streaming response body arrives as arbitrary byte chunks: one
//! protocol line may be split across several chunks and one chunk may
//! carry several lines. [`LineDecoder`] buffers the undelimited tail so
//! the produced line sequence is identical however the bytes were
//! chunked, including splits in the middle of a multi-byte UTF-8
//! sequence.

/// Splits a chunked byte stream into complete `\n`-terminated lines.
///
/// Each run owns its own decoder; no state is shared across runs.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and drain every line completed by it.
    ///
    /// The trailing partial line, if any, stays buffered for the next
    /// chunk. Returned lines have the `\n` (and a preceding `\r`)
    /// stripped. A line that is not valid UTF-8 is replaced lossily; it
    /// will fail JSON parsing downstream and be skipped there.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Flush the final unterminated line at end of stream, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Some(line)
    }
}
