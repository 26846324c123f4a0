use std::fs;
use std::time::Duration;

use remoting_frame::{Packet, TlvCodec};
use remoting_session::{Inbound, Session};
use remoting_transport::connect;
use tracing::debug;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{io_error, transport_error, CliError, CliResult, FAILURE, SUCCESS, TIMEOUT};
use crate::output::{print_packet, OutputFormat};

pub async fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let config = args.session.to_config()?;
    let data = resolve_data(&args)?;

    let stream = connect(args.addr, &config.tcp)
        .await
        .map_err(|err| transport_error("connect failed", err))?;
    let remote = args.addr.to_string();
    let (session, mut inbound) = Session::spawn(stream, remote.clone(), TlvCodec, config);

    session
        .submit(Packet::new(args.opaque, args.cmd, data))
        .await;

    if args.wait {
        let reply = wait_for_reply(&mut inbound, args.opaque, wait_timeout).await;
        session.close();
        session.join().await;
        print_packet(&reply?, &remote, format);
        return Ok(SUCCESS);
    }

    // Dropping the only handle flushes the queue and half-closes; the peer
    // answers by closing its side.
    drop(session);
    tokio::time::timeout(wait_timeout, async {
        while inbound.recv().await.is_some() {}
    })
    .await
    .map_err(|_| {
        CliError::new(
            TIMEOUT,
            format!("peer did not close within {wait_timeout:?}"),
        )
    })?;

    Ok(SUCCESS)
}

fn resolve_data(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}

/// Wait for the packet answering `opaque`, skipping unrelated traffic.
async fn wait_for_reply(
    inbound: &mut Inbound<Packet>,
    opaque: u32,
    timeout: Duration,
) -> CliResult<Packet> {
    let reply = tokio::time::timeout(timeout, async {
        while let Some(packet) = inbound.recv().await {
            if packet.opaque == opaque {
                return Some(packet);
            }
            debug!(opaque = packet.opaque, "skipping unrelated packet");
        }
        None
    })
    .await
    .map_err(|_| CliError::new(TIMEOUT, format!("no reply within {timeout:?}")))?;

    reply.ok_or_else(|| CliError::new(FAILURE, "connection closed before reply"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use remoting_frame::PacketCodec;
    use remoting_session::SessionConfig;
    use tokio::io::AsyncWriteExt;

    use super::*;
    use crate::cmd::SessionArgs;

    fn send_args(data: Option<&str>, file: Option<PathBuf>) -> SendArgs {
        SendArgs {
            addr: "127.0.0.1:1".parse().unwrap(),
            cmd: 1,
            opaque: 0,
            data: data.map(str::to_string),
            file,
            wait: false,
            wait_timeout: "5s".to_string(),
            session: SessionArgs {
                queue_capacity: 4,
                max_frame_len: 0,
                keepalive: "off".to_string(),
                no_nodelay: false,
            },
        }
    }

    fn wire(packet: &Packet) -> Vec<u8> {
        TlvCodec.encode(packet).to_vec()
    }

    #[test]
    fn data_defaults_to_empty() {
        assert!(resolve_data(&send_args(None, None)).unwrap().is_empty());
        assert_eq!(resolve_data(&send_args(Some("abc"), None)).unwrap(), b"abc");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = resolve_data(&send_args(None, Some(PathBuf::from("/nonexistent/remoting-body"))))
            .unwrap_err();
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("failed reading"));
    }

    #[tokio::test]
    async fn reply_is_matched_by_opaque() {
        let (local, mut peer) = tokio::io::duplex(1024);
        let (_session, mut inbound) =
            Session::spawn(local, "peer", TlvCodec, SessionConfig::default());

        peer.write_all(&wire(&Packet::new(1, 5, "other"))).await.unwrap();
        peer.write_all(&wire(&Packet::new(2, 5, "mine"))).await.unwrap();

        let reply = wait_for_reply(&mut inbound, 2, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(reply.data.as_ref(), b"mine");
    }

    #[tokio::test]
    async fn closed_connection_fails_wait() {
        let (local, peer) = tokio::io::duplex(1024);
        let (_session, mut inbound) =
            Session::spawn(local, "peer", TlvCodec, SessionConfig::default());
        drop(peer);

        let err = wait_for_reply(&mut inbound, 2, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.code, FAILURE);
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let (local, _peer) = tokio::io::duplex(1024);
        let (_session, mut inbound) =
            Session::spawn(local, "peer", TlvCodec, SessionConfig::default());

        let err = wait_for_reply(&mut inbound, 2, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.code, TIMEOUT);
    }
}
