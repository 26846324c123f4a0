//! Per-connection packet sessions.
//!
//! A [`Session`] owns one established byte stream and turns it into two
//! ordered pipelines: inbound packets parsed from the stream and outbound
//! packets serialized onto it. Each direction runs as its own pump task.
//! The session's open/closed lifecycle is shared by both pumps and any
//! external caller, and closing is idempotent from all of them.

pub mod config;
pub mod error;
mod pump;
pub mod session;

pub use config::{SessionConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{Result, SessionError};
pub use session::{Inbound, Session};
