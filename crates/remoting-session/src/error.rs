/// Errors that can occur while establishing or running a session.
///
/// Callers of [`crate::Session::submit`] never see these; a failing session
/// only becomes observable through its closed state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] remoting_transport::TransportError),

    /// I/O error outside of framing (e.g. querying the peer address).
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
