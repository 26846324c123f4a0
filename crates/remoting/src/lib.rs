//! Per-connection remoting sessions for a message broker.
//!
//! A broker connection carries delimiter-terminated packets in both
//! directions. This crate ties together the pieces that turn one TCP stream
//! into an ordered inbound packet stream and an ordered outbound submit queue.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP listener, connector and the socket options a session needs
//! - [`frame`]: delimiter framing, the packet codec seam and the reference TLV codec
//! - [`session`]: the session aggregate and its inbound/outbound pumps
//!
//! # Example
//!
//! ```no_run
//! use remoting::frame::{Packet, TlvCodec};
//! use remoting::session::{Session, SessionConfig};
//! use remoting::transport::{connect, TcpOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = connect("127.0.0.1:10911".parse()?, &TcpOptions::default()).await?;
//! let (session, mut inbound) = Session::from_tcp(stream, TlvCodec, SessionConfig::default())?;
//!
//! session.submit(Packet::new(1, 10, "hello")).await;
//! if let Some(reply) = inbound.recv().await {
//!     println!("reply {} ({} bytes)", reply.opaque, reply.data.len());
//! }
//! session.close();
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use remoting_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use remoting_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use remoting_session::*;
}
