//! Reference TLV packet codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────┬───────────┬──────────────┬──────────────┬──────────┐
//! │ Opaque (4B)  │ Cmd (1B)  │ Length (4B)  │ Data         │ CR LF    │
//! │ u32 BE       │ u8        │ u32 BE       │ Length bytes │ 0x0D0A   │
//! └──────────────┴───────────┴──────────────┴──────────────┴──────────┘
//! ```
//!
//! Data containing CR LF splits the frame on the wire; the fragments fail
//! the length check and are dropped.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::{PacketCodec, DEFAULT_DELIMITER};
use crate::error::CodecError;

/// A decoded broker packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlation id chosen by the sender.
    pub opaque: u32,
    /// Command type.
    pub cmd_type: u8,
    /// Command body.
    pub data: Bytes,
}

impl Packet {
    /// Create a new packet.
    pub fn new(opaque: u32, cmd_type: u8, data: impl Into<Bytes>) -> Self {
        Self {
            opaque,
            cmd_type,
            data: data.into(),
        }
    }

    /// The total wire size of this packet (header + data + delimiter).
    pub fn wire_size(&self) -> usize {
        TlvCodec::HEADER_LEN + self.data.len() + DEFAULT_DELIMITER.len()
    }
}

/// Type-length-value codec for [`Packet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvCodec;

impl TlvCodec {
    /// Header: opaque (4) + cmd type (1) + length (4) = 9 bytes.
    pub const HEADER_LEN: usize = 9;
}

impl PacketCodec for TlvCodec {
    type Packet = Packet;

    fn decode(&self, frame: &[u8]) -> Result<Option<Packet>, CodecError> {
        let min = Self::HEADER_LEN + DEFAULT_DELIMITER.len();
        if frame.len() < min {
            return Err(CodecError::Truncated {
                len: frame.len(),
                min,
            });
        }
        let Some(mut body) = frame.strip_suffix(&DEFAULT_DELIMITER[..]) else {
            return Err(CodecError::MissingDelimiter);
        };

        let opaque = body.get_u32();
        let cmd_type = body.get_u8();
        let declared = body.get_u32() as usize;
        if declared != body.len() {
            return Err(CodecError::LengthMismatch {
                declared,
                actual: body.len(),
            });
        }

        Ok(Some(Packet {
            opaque,
            cmd_type,
            data: Bytes::copy_from_slice(body),
        }))
    }

    fn encode(&self, packet: &Packet) -> Bytes {
        let Ok(len) = u32::try_from(packet.data.len()) else {
            debug!(len = packet.data.len(), "packet data exceeds u32 length field");
            return Bytes::new();
        };

        let mut dst = BytesMut::with_capacity(packet.wire_size());
        dst.put_u32(packet.opaque);
        dst.put_u8(packet.cmd_type);
        dst.put_u32(len);
        dst.put_slice(&packet.data);
        dst.put_slice(&DEFAULT_DELIMITER);
        dst.freeze()
    }
}
