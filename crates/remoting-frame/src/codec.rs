use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::tlv::TlvCodec;

/// Frame delimiter: CR LF (0x0D 0x0A).
pub const DEFAULT_DELIMITER: [u8; 2] = *b"\r\n";

/// Default maximum frame size: 16 MiB.
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Packet encoding consumed by a session.
///
/// Implementations are pure: no state that changes between calls, no I/O.
/// A single codec instance is shared by both directions of a session.
pub trait PacketCodec: Send + Sync + 'static {
    /// The decoded protocol message.
    type Packet: Send + 'static;

    /// Decode one complete frame, trailing delimiter included.
    ///
    /// `Ok(None)` means the frame carried no packet. Both `Ok(None)` and
    /// `Err(_)` cause the frame to be dropped; neither ends the stream.
    fn decode(&self, frame: &[u8]) -> Result<Option<Self::Packet>, CodecError>;

    /// Encode a packet to its wire bytes, trailing delimiter included.
    ///
    /// An empty result is never written.
    fn encode(&self, packet: &Self::Packet) -> Bytes;
}

/// Configuration for frame accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Two-byte frame terminator.
    pub delimiter: [u8; 2],
    /// Minimum header length. A frame is decoded only when its length,
    /// delimiter included, exceeds this value.
    pub header_len: usize,
    /// Maximum frame length in bytes. `None` grows until allocation fails.
    pub max_frame_len: Option<usize>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            header_len: TlvCodec::HEADER_LEN,
            max_frame_len: Some(DEFAULT_MAX_FRAME_LEN),
        }
    }
}

impl FrameConfig {
    /// Whether a frame of `len` bytes (delimiter included) is long enough to decode.
    pub fn is_decodable_len(&self, len: usize) -> bool {
        len > self.header_len
    }
}
