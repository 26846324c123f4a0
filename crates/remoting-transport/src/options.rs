use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{Result, TransportError};

/// Default keep-alive probe interval applied to session streams.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(3);

/// Socket options applied to every session stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpOptions {
    /// Keep-alive probe interval. `None` disables keep-alive.
    pub keepalive: Option<Duration>,
    /// Disable send coalescing (`TCP_NODELAY`).
    pub nodelay: bool,
}

impl Default for TcpOptions {
    fn default() -> Self {
        Self {
            keepalive: Some(DEFAULT_KEEPALIVE),
            nodelay: true,
        }
    }
}

/// Apply `options` to an established stream.
pub fn configure_stream(stream: &TcpStream, options: &TcpOptions) -> Result<()> {
    stream
        .set_nodelay(options.nodelay)
        .map_err(|source| TransportError::SocketOption {
            option: "TCP_NODELAY",
            source,
        })?;
    set_keepalive(stream, options.keepalive)?;
    debug!(
        nodelay = options.nodelay,
        keepalive = ?options.keepalive,
        "configured session stream"
    );
    Ok(())
}

#[cfg(unix)]
fn set_keepalive(stream: &TcpStream, period: Option<Duration>) -> Result<()> {
    use std::os::fd::AsRawFd;

    let fd = stream.as_raw_fd();
    setsockopt_int(
        fd,
        libc::SOL_SOCKET,
        libc::SO_KEEPALIVE,
        libc::c_int::from(period.is_some()),
        "SO_KEEPALIVE",
    )?;

    let Some(period) = period else {
        return Ok(());
    };
    let secs = period.as_secs().clamp(1, libc::c_int::MAX as u64) as libc::c_int;
    set_keepalive_timing(fd, secs)
}

// Idle time before the first probe and the interval between probes both
// follow the configured period.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn set_keepalive_timing(fd: std::os::fd::RawFd, secs: libc::c_int) -> Result<()> {
    setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPIDLE, secs, "TCP_KEEPIDLE")?;
    setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPINTVL, secs, "TCP_KEEPINTVL")
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn set_keepalive_timing(fd: std::os::fd::RawFd, secs: libc::c_int) -> Result<()> {
    setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPALIVE, secs, "TCP_KEEPALIVE")?;
    setsockopt_int(fd, libc::IPPROTO_TCP, libc::TCP_KEEPINTVL, secs, "TCP_KEEPINTVL")
}

#[cfg(all(
    unix,
    not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "macos",
        target_os = "ios"
    ))
))]
fn set_keepalive_timing(_fd: std::os::fd::RawFd, secs: libc::c_int) -> Result<()> {
    debug!(secs, "keep-alive timing unsupported on this platform; using system defaults");
    Ok(())
}

#[cfg(not(unix))]
fn set_keepalive(_stream: &TcpStream, period: Option<Duration>) -> Result<()> {
    debug!(keepalive = ?period, "keep-alive tuning unsupported on this platform");
    Ok(())
}

#[cfg(unix)]
fn setsockopt_int(
    fd: std::os::fd::RawFd,
    level: libc::c_int,
    name: libc::c_int,
    value: libc::c_int,
    option: &'static str,
) -> Result<()> {
    // SAFETY: `value` is a live c_int for the duration of the call, the length
    // passed matches its size, and `fd` is an open socket owned by the stream.
    let rc = unsafe {
        libc::setsockopt(
            fd,
            level,
            name,
            (&value as *const libc::c_int).cast::<libc::c_void>(),
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if rc == 0 {
        Ok(())
    } else {
        Err(TransportError::SocketOption {
            option,
            source: std::io::Error::last_os_error(),
        })
    }
}
