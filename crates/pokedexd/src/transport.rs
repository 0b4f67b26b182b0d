//! Line-delimited transport over an async reader and writer.
//!
//! Each request is one line terminated by `\n`; each response is written as
//! one line and flushed before the next request is read. The transport is
//! generic so tests can drive it with in-memory buffers.

use std::io;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, trace};

use crate::dispatch::DispatchError;

/// Maximum size of a single request line in bytes, excluding the delimiter.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Tracing target for transport events.
const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Reads request lines and writes response lines.
#[derive(Debug)]
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    max_line_bytes: usize,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport with the default line limit.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_limit(reader, writer, MAX_REQUEST_BYTES)
    }

    /// Creates a transport accepting lines of at most `max_line_bytes`.
    pub fn with_limit(reader: R, writer: W, max_line_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            max_line_bytes,
        }
    }

    /// Reads the next raw line, without its delimiter.
    ///
    /// Returns `Ok(None)` once the input is closed. A final line without a
    /// trailing newline is still returned. Lines longer than the limit are
    /// consumed up to their delimiter and reported as
    /// [`DispatchError::RequestTooLarge`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::RequestTooLarge`] for oversized lines and
    /// [`DispatchError::Internal`] for read failures.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>, DispatchError> {
        let mut line = Vec::new();
        let limit = u64::try_from(self.max_line_bytes)
            .unwrap_or(u64::MAX)
            .saturating_add(1);
        let read = match (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut line)
            .await
        {
            Ok(read) => read,
            Err(error) if is_closure(&error) => {
                debug!(target: TRANSPORT_TARGET, %error, "input closed");
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        if read == 0 {
            return Ok(None);
        }

        let terminated = line.last() == Some(&b'\n');
        if terminated {
            line.pop();
        }

        if line.len() > self.max_line_bytes {
            let discarded = if terminated {
                0
            } else {
                skip_to_delimiter(&mut self.reader).await?
            };
            return Err(DispatchError::RequestTooLarge {
                size: line.len().saturating_add(discarded),
                max_size: self.max_line_bytes,
            });
        }

        trace!(target: TRANSPORT_TARGET, len = line.len(), "read line");
        Ok(Some(line))
    }

    /// Writes `line` and flushes the output.
    ///
    /// A trailing newline is appended when `line` lacks one.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error when writing or flushing fails.
    pub async fn write_line(&mut self, line: &str) -> io::Result<()> {
        trace!(target: TRANSPORT_TARGET, len = line.len(), "writing line");
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await
    }

    /// Output half, primarily useful for testing.
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

/// Whether a read error means the peer went away.
fn is_closure(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
    )
}

/// Consumes input up to and including the next newline, returning the
/// number of bytes skipped before it.
async fn skip_to_delimiter<R>(reader: &mut R) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0_usize;
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(skipped);
            }
            match available.iter().position(|byte| *byte == b'\n') {
                Some(position) => (position + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(skipped.saturating_add(consumed - 1));
        }
        skipped = skipped.saturating_add(consumed);
    }
}
