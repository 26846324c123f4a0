//! Delimiter-terminated framing for broker sessions.
//!
//! Every frame on the wire ends with a fixed two-byte delimiter (CR LF by
//! default). This crate splits an incoming byte stream into those frames and
//! defines the codec boundary that turns frames into packets:
//! - [`FrameAccumulator`] scans a stream and yields complete frame buffers
//! - [`FrameWriter`] writes encoded packets out whole
//! - [`PacketCodec`] is the black-box `decode`/`encode` pair a session drives
//! - [`TlvCodec`] is the reference type-length-value codec
//!
//! Stream-level failures ([`FrameError`]) and frame-local decode failures
//! ([`CodecError`]) are distinct types and are never merged.

pub mod codec;
pub mod error;
pub mod reader;
pub mod tlv;
pub mod writer;

pub use codec::{FrameConfig, PacketCodec, DEFAULT_DELIMITER, DEFAULT_MAX_FRAME_LEN};
pub use error::{CodecError, FrameError, Result};
pub use reader::FrameAccumulator;
pub use tlv::{Packet, TlvCodec};
pub use writer::FrameWriter;
