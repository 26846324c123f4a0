/// Stream-level framing errors. Any of these ends the connection.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before the next frame boundary.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// The frame in flight grew past the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The frame buffer could not be grown.
    #[error("frame buffer exhausted growing to {size} bytes")]
    BufferExhausted { size: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Frame-local decode errors. The frame is dropped and the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The frame is shorter than the packet header plus delimiter.
    #[error("frame truncated ({len} bytes, need at least {min})")]
    Truncated { len: usize, min: usize },

    /// The frame does not end with the packet delimiter.
    #[error("frame does not end with the packet delimiter")]
    MissingDelimiter,

    /// The header's declared body length disagrees with the frame.
    #[error("declared length {declared} does not match body length {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Codec-specific rejection.
    #[error("invalid packet: {0}")]
    Invalid(String),
}
