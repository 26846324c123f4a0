use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use remoting_frame::{Packet, DEFAULT_MAX_FRAME_LEN};
use remoting_session::{Session, SessionConfig, DEFAULT_QUEUE_CAPACITY};
use remoting_transport::TcpOptions;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod echo;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept sessions and echo every packet back.
    Echo(EchoArgs),
    /// Send a single packet.
    Send(SendArgs),
    /// Accept sessions and print received packets.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub async fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Echo(args) => echo::run(args).await,
        Command::Send(args) => send::run(args, format).await,
        Command::Listen(args) => listen::run(args, format).await,
        Command::Version(args) => version::run(args),
    }
}

/// Close every session and wait for each to release its connection.
pub(crate) async fn close_sessions(sessions: Vec<Session<Packet>>) {
    for session in &sessions {
        session.close();
    }
    for session in &sessions {
        session.join().await;
    }
}

/// Session tuning shared by every networked command.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Capacity of each session queue.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
    /// Largest inbound frame in bytes; 0 disables the limit.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    pub max_frame_len: usize,
    /// TCP keep-alive interval (e.g. 3s, 500ms) or "off".
    #[arg(long, default_value = "3s")]
    pub keepalive: String,
    /// Leave send coalescing (Nagle) enabled.
    #[arg(long)]
    pub no_nodelay: bool,
}

impl SessionArgs {
    pub fn to_config(&self) -> CliResult<SessionConfig> {
        let keepalive = match self.keepalive.trim() {
            "off" | "none" => None,
            other => Some(parse_duration(other)?),
        };
        let max_frame_len = (self.max_frame_len > 0).then_some(self.max_frame_len);

        Ok(SessionConfig::default()
            .with_queue_capacity(self.queue_capacity)
            .with_max_frame_len(max_frame_len)
            .with_tcp_options(TcpOptions {
                keepalive,
                nodelay: !self.no_nodelay,
            }))
    }
}

#[derive(Args, Debug)]
pub struct EchoArgs {
    /// Address to bind (ip:port).
    pub addr: SocketAddr,
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Address to connect to (ip:port).
    pub addr: SocketAddr,
    /// Command type of the packet.
    #[arg(long)]
    pub cmd: u8,
    /// Correlation id of the packet.
    #[arg(long, default_value_t = 0)]
    pub opaque: u32,
    /// Raw string body.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read body from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Wait for one reply packet and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for the reply, or for the peer to close (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to bind (ip:port).
    pub addr: SocketAddr,
    /// Exit after receiving N packets.
    #[arg(long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}
