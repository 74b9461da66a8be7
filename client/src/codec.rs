//! Newline-delimited JSON framing for the analyzer's stdio streams.
//!
//! The analyzer emits one JSON object per line, but the pipe delivers
//! arbitrary chunks: a chunk may hold a fragment of a message, or several
//! messages plus the start of another. [`LineFramer`] accumulates bytes and
//! yields each completed line's JSON value; [`LineWriter`] frames outbound
//! requests the same way.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Incremental splitter for a newline-delimited JSON byte stream.
///
/// Feeding the concatenation of all chunks at once yields the same message
/// sequence as feeding them one by one: only newline-terminated lines are
/// parsed, and the unterminated tail is carried over to the next feed.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every message it completes, in order.
    ///
    /// Blank lines are skipped. A terminated line that is not valid JSON is
    /// dropped with a trace log. An unterminated tail is retained whether it
    /// is a truncated message or data that will never parse — the two are
    /// indistinguishable until the delimiter arrives.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<serde_json::Value> {
        self.buf.extend_from_slice(chunk);

        let mut messages = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buf[consumed..].iter().position(|&b| b == b'\n') {
            let line = self.buf[consumed..consumed + offset].trim_ascii();
            consumed += offset + 1;

            if line.is_empty() {
                continue;
            }
            match serde_json::from_slice(line) {
                Ok(value) => messages.push(value),
                Err(e) => {
                    tracing::trace!("Dropping unparseable analyzer line: {e}");
                }
            }
        }
        // Consumed prefix is removed and never re-parsed.
        self.buf.drain(..consumed);
        messages
    }

    /// Bytes held back waiting for a delimiter.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Writes one JSON object per line to the analyzer's stdin.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serialize `msg`, append the line delimiter, and flush.
    pub async fn write_frame(&mut self, msg: &serde_json::Value) -> std::io::Result<()> {
        let mut body = serde_json::to_vec(msg)?;
        body.push(b'\n');
        self.writer.write_all(&body).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
