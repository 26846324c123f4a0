use std::future::Future;
use std::io;

use remoting_frame::{Packet, TlvCodec};
use remoting_session::{Inbound, Session, SessionConfig};
use remoting_transport::SessionListener;
use tracing::{debug, info, warn};

use crate::cmd::{close_sessions, EchoArgs};
use crate::exit::{transport_error, CliError, CliResult, INTERNAL, SUCCESS};

pub async fn run(args: EchoArgs) -> CliResult<i32> {
    let config = args.session.to_config()?;
    let listener = SessionListener::bind_with_options(args.addr, config.tcp.clone())
        .await
        .map_err(|err| transport_error("bind failed", err))?;

    serve(listener, config, tokio::signal::ctrl_c()).await?;
    Ok(SUCCESS)
}

/// Accept sessions until `shutdown` resolves, echoing every packet back to
/// the session it arrived on.
pub(crate) async fn serve<F>(
    listener: SessionListener,
    config: SessionConfig,
    shutdown: F,
) -> CliResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "echo server listening");
    }

    tokio::pin!(shutdown);
    let mut sessions: Vec<Session<Packet>> = Vec::new();

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.map_err(|err| {
                    CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
                })?;
                info!("shutting down echo server");
                break;
            }
            accepted = listener.accept() => {
                let (stream, remote) = accepted.map_err(|err| transport_error("accept failed", err))?;
                let (session, inbound) =
                    Session::spawn(stream, remote.to_string(), TlvCodec, config.clone());
                tokio::spawn(echo_packets(session.clone(), inbound));

                sessions.retain(|session| !session.is_closed());
                sessions.push(session);
            }
        }
    }

    close_sessions(sessions).await;
    Ok(())
}

async fn echo_packets(session: Session<Packet>, mut inbound: Inbound<Packet>) {
    while let Some(packet) = inbound.recv().await {
        debug!(
            remote = session.remote_addr(),
            opaque = packet.opaque,
            cmd = packet.cmd_type,
            size = packet.data.len(),
            "echoing packet"
        );
        session.submit(packet).await;
    }
    if !session.is_closed() {
        warn!(remote = session.remote_addr(), "inbound ended on an open session");
    }
}
