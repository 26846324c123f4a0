use std::future::Future;
use std::io;

use remoting_frame::{Packet, TlvCodec};
use remoting_session::{Inbound, Session, SessionConfig};
use remoting_transport::SessionListener;
use tokio::sync::mpsc;
use tracing::info;

use crate::cmd::{close_sessions, ListenArgs};
use crate::exit::{transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub async fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.session.to_config()?;
    let listener = SessionListener::bind_with_options(args.addr, config.tcp.clone())
        .await
        .map_err(|err| transport_error("bind failed", err))?;

    receive(
        listener,
        config,
        args.count,
        tokio::signal::ctrl_c(),
        |remote, packet| print_packet(packet, remote, format),
    )
    .await?;
    Ok(SUCCESS)
}

/// Accept sessions and hand every inbound packet to `on_packet`, until
/// `count` packets were seen or `shutdown` resolves.
pub(crate) async fn receive<F, P>(
    listener: SessionListener,
    config: SessionConfig,
    count: Option<usize>,
    shutdown: F,
    mut on_packet: P,
) -> CliResult<()>
where
    F: Future<Output = io::Result<()>>,
    P: FnMut(&str, &Packet),
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "listening");
    }
    if count == Some(0) {
        return Ok(());
    }

    tokio::pin!(shutdown);
    let (tx, mut rx) = mpsc::channel::<(String, Packet)>(config.queue_capacity.max(1));
    let mut sessions: Vec<Session<Packet>> = Vec::new();
    let mut seen = 0usize;

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.map_err(|err| {
                    CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
                })?;
                break;
            }
            accepted = listener.accept() => {
                let (stream, remote) = accepted.map_err(|err| transport_error("accept failed", err))?;
                let (session, inbound) =
                    Session::spawn(stream, remote.to_string(), TlvCodec, config.clone());
                tokio::spawn(forward(remote.to_string(), inbound, tx.clone()));

                sessions.retain(|session| !session.is_closed());
                sessions.push(session);
            }
            Some((remote, packet)) = rx.recv() => {
                on_packet(&remote, &packet);
                seen = seen.saturating_add(1);
                if count.is_some_and(|count| seen >= count) {
                    break;
                }
            }
        }
    }

    close_sessions(sessions).await;
    Ok(())
}

async fn forward(remote: String, mut inbound: Inbound<Packet>, tx: mpsc::Sender<(String, Packet)>) {
    while let Some(packet) = inbound.recv().await {
        if tx.send((remote.clone(), packet)).await.is_err() {
            break;
        }
    }
}
