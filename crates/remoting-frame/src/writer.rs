use std::io::ErrorKind;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{FrameError, Result};

/// Writes complete encoded frames to any `AsyncWrite` stream.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Create a new frame writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one encoded frame in full, then flush.
    pub async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]).await {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush().await
    }

    /// Flush the underlying stream.
    pub async fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush().await {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Shut down the write side of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await.map_err(FrameError::Io)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
