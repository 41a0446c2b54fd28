//! Feeding byte streams into terminal channels

use std::borrow::Cow;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace, warn};
use vtty_terminal::{Channel, VirtualTerminal};

const READ_CHUNK: usize = 4096;

/// Longest incomplete UTF-8 prefix that can still become a valid character
const MAX_INCOMPLETE: usize = 3;

/// Cuts a byte stream into valid UTF-8 text.
///
/// Reads from a pipe may split a multi-byte character. The incomplete tail
/// is held back and joined with the next read. Bytes that can never form a
/// character are replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` and return all text that is complete so far
    pub fn push(&mut self, data: &[u8]) -> String {
        self.pending.extend_from_slice(data);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    match err.error_len() {
                        None => {
                            self.pending.drain(..valid);
                            debug_assert!(self.pending.len() <= MAX_INCOMPLETE);
                            trace!(held = self.pending.len(), "holding back split character");
                            break;
                        }
                        Some(len) => {
                            warn!(bytes = ?&self.pending[valid..valid + len], "replacing invalid UTF-8");
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush whatever is still held back at end of stream
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }

        warn!(bytes = ?self.pending, "stream ended inside a UTF-8 character");
        let text = match String::from_utf8_lossy(&self.pending) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => text,
        };
        self.pending.clear();
        text
    }
}

/// Copy `reader` into one channel of `terminal` until end of stream.
///
/// Returns the number of bytes read.
pub async fn pump<R>(mut reader: R, terminal: VirtualTerminal, channel: Channel) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK];
    let mut chunker = Utf8Chunker::new();
    let mut total = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .with_context(|| format!("Failed to read {channel} stream"))?;
        if n == 0 {
            break;
        }
        total += n as u64;

        let text = chunker.push(&buf[..n]);
        if !text.is_empty() {
            terminal.write(channel, text)?;
        }
    }

    let rest = chunker.finish();
    if !rest.is_empty() {
        terminal.write(channel, rest)?;
    }

    debug!(%channel, bytes = total, "stream finished");
    Ok(total)
}
