use std::io::ErrorKind;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, trace};

use crate::codec::FrameConfig;
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_BUFFER_SIZE: usize = 8 * 1024;
/// Accumulator capacity retained between frames; anything above is released.
const RETAINED_CAPACITY: usize = 64 * 1024;

/// Accumulates delimiter-terminated frames from any `AsyncRead` stream.
///
/// Scans for the first delimiter byte, then reads exactly one more byte.
/// Only when that byte completes the delimiter is a boundary reached.
/// Boundaries too short to hold a header are discarded internally, so
/// callers only ever see frames worth decoding.
pub struct FrameAccumulator<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    config: FrameConfig,
}

impl<R: AsyncRead + Unpin> FrameAccumulator<R> {
    /// Create a new accumulator with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new accumulator with explicit configuration.
    pub fn with_config(inner: R, config: FrameConfig) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_BUFFER_SIZE, inner),
            buf: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read up to the next decodable frame boundary.
    ///
    /// The returned slice includes the trailing delimiter and stays valid
    /// until the next call. Every error is stream-fatal:
    /// `ConnectionClosed` at EOF, `Io` on a failed read, `FrameTooLarge` or
    /// `BufferExhausted` when the frame cannot grow.
    pub async fn next_frame(&mut self) -> Result<&[u8]> {
        self.reset();
        loop {
            self.read_through_first_delimiter().await?;

            let second = match self.inner.read_u8().await {
                Ok(byte) => byte,
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                    return Err(FrameError::ConnectionClosed)
                }
                Err(err) => return Err(FrameError::Io(err)),
            };
            grow(&mut self.buf, 1, self.config.max_frame_len)?;
            self.buf.push(second);

            if second != self.config.delimiter[1] {
                // Lone first delimiter byte: payload, keep scanning.
                continue;
            }

            if self.config.is_decodable_len(self.buf.len()) {
                trace!(len = self.buf.len(), "frame boundary");
                return Ok(self.buf.as_slice());
            }

            debug!(
                len = self.buf.len(),
                header_len = self.config.header_len,
                "discarding sub-minimum frame"
            );
            self.reset();
        }
    }

    /// Append bytes up to and including the first delimiter byte.
    async fn read_through_first_delimiter(&mut self) -> Result<()> {
        let first = self.config.delimiter[0];
        loop {
            let available = match self.inner.fill_buf().await {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };
            if available.is_empty() {
                return Err(FrameError::ConnectionClosed);
            }

            let (take, found) = match available.iter().position(|&b| b == first) {
                Some(idx) => (idx + 1, true),
                None => (available.len(), false),
            };
            grow(&mut self.buf, take, self.config.max_frame_len)?;
            self.buf.extend_from_slice(&available[..take]);
            self.inner.consume(take);

            if found {
                return Ok(());
            }
        }
    }

    fn reset(&mut self) {
        self.buf.clear();
        if self.buf.capacity() > RETAINED_CAPACITY {
            self.buf.shrink_to(INITIAL_BUFFER_CAPACITY);
        }
    }

    /// Number of bytes accumulated for the frame in flight.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Consume the accumulator and return the inner stream.
    ///
    /// Bytes already buffered but not yet framed are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    /// Current accumulator configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Make room for `additional` bytes, honouring the optional frame cap.
fn grow(buf: &mut Vec<u8>, additional: usize, max: Option<usize>) -> Result<()> {
    let size = buf.len().saturating_add(additional);
    if let Some(max) = max {
        if size > max {
            return Err(FrameError::FrameTooLarge { size, max });
        }
    }
    buf.try_reserve(additional)
        .map_err(|_| FrameError::BufferExhausted { size })
}
