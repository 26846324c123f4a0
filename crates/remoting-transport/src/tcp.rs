use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::options::{configure_stream, TcpOptions};

/// Accepts TCP connections destined to become sessions.
///
/// Every accepted stream has [`TcpOptions`] applied before it is handed out.
pub struct SessionListener {
    listener: TcpListener,
    options: TcpOptions,
}

impl SessionListener {
    /// Bind and listen on `addr` with default socket options.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        Self::bind_with_options(addr, TcpOptions::default()).await
    }

    /// Bind and listen on `addr` with explicit socket options.
    pub async fn bind_with_options(addr: SocketAddr, options: TcpOptions) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        let local = listener.local_addr()?;
        info!(%local, "listening for sessions");

        Ok(Self { listener, options })
    }

    /// Accept the next connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, remote) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;
        configure_stream(&stream, &self.options)?;
        debug!(%remote, "accepted connection");
        Ok((stream, remote))
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Socket options applied to accepted streams.
    pub fn options(&self) -> &TcpOptions {
        &self.options
    }
}

/// Connect to a listening peer and apply `options` to the stream.
pub async fn connect(addr: SocketAddr, options: &TcpOptions) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| TransportError::Connect { addr, source })?;
    configure_stream(&stream, options)?;
    debug!(%addr, "connected");
    Ok(stream)
}
