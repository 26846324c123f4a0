//! TCP transport for broker sessions.
//!
//! Provides the connection plumbing that sits underneath a session:
//! - [`SessionListener`] to accept peers
//! - [`connect`] to dial a peer
//! - [`TcpOptions`] / [`configure_stream`] for the keep-alive and no-delay
//!   settings every session stream is expected to carry
//!
//! This is the lowest layer of remoting. Acceptance and dialing policy
//! (retry, reconnect, routing) belong to the caller.

pub mod error;
pub mod options;
pub mod tcp;

pub use error::{Result, TransportError};
pub use options::{configure_stream, TcpOptions, DEFAULT_KEEPALIVE};
pub use tcp::{connect, SessionListener};
