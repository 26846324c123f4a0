use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use remoting_frame::{FrameAccumulator, FrameError, FrameWriter, PacketCodec};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::session::Shared;

/// Reads frames off the stream, decodes them and feeds the inbound queue.
pub(crate) struct InboundPump<R, C: PacketCodec> {
    shared: Arc<Shared>,
    frames: FrameAccumulator<R>,
    codec: Arc<C>,
    queue: mpsc::Sender<C::Packet>,
}

impl<R, C> InboundPump<R, C>
where
    R: AsyncRead + Unpin,
    C: PacketCodec,
{
    pub(crate) fn new(
        shared: Arc<Shared>,
        frames: FrameAccumulator<R>,
        codec: Arc<C>,
        queue: mpsc::Sender<C::Packet>,
    ) -> Self {
        Self {
            shared,
            frames,
            codec,
            queue,
        }
    }

    /// Run until the session closes or the stream fails.
    ///
    /// Returning drops the queue sender, which closes the inbound queue.
    pub(crate) async fn run(mut self) {
        let remote = self.shared.remote_addr.as_str();
        let mut consumer_gone = false;

        while !self.shared.is_closed() {
            let frame = tokio::select! {
                biased;
                _ = self.shared.shutdown.cancelled() => break,
                frame = self.frames.next_frame() => frame,
            };

            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    log_read_failure(remote, &err);
                    self.shared.close();
                    break;
                }
            };

            let decoded = catch_unwind(AssertUnwindSafe(|| self.codec.decode(frame)));
            let decoded = match decoded {
                Ok(decoded) => decoded,
                Err(payload) => {
                    error!(
                        remote,
                        len = frame.len(),
                        panic = %panic_message(payload.as_ref()),
                        "codec panicked decoding frame; frame dropped"
                    );
                    continue;
                }
            };

            let packet = match decoded {
                Ok(Some(packet)) => packet,
                Ok(None) => {
                    debug!(remote, len = frame.len(), "codec produced no packet; frame dropped");
                    continue;
                }
                Err(err) => {
                    warn!(remote, len = frame.len(), error = %err, "undecodable frame dropped");
                    continue;
                }
            };

            if consumer_gone {
                continue;
            }
            let sent = tokio::select! {
                biased;
                _ = self.shared.shutdown.cancelled() => break,
                sent = self.queue.send(packet) => sent,
            };
            if sent.is_err() {
                debug!(remote, "inbound consumer dropped; discarding further packets");
                consumer_gone = true;
            }
        }

        debug!(remote, "inbound pump exited");
    }
}

fn log_read_failure(remote: &str, err: &FrameError) {
    match err {
        FrameError::ConnectionClosed => {
            info!(remote, "peer closed connection; closing session");
        }
        other => {
            warn!(remote, error = %other, "read failed; closing session");
        }
    }
}

/// Drains the outbound queue, encodes packets and writes them to the stream.
pub(crate) struct OutboundPump<W, C: PacketCodec> {
    shared: Arc<Shared>,
    writer: FrameWriter<W>,
    codec: Arc<C>,
    queue: mpsc::Receiver<C::Packet>,
}

impl<W, C> OutboundPump<W, C>
where
    W: AsyncWrite + Unpin,
    C: PacketCodec,
{
    pub(crate) fn new(
        shared: Arc<Shared>,
        writer: FrameWriter<W>,
        codec: Arc<C>,
        queue: mpsc::Receiver<C::Packet>,
    ) -> Self {
        Self {
            shared,
            writer,
            codec,
            queue,
        }
    }

    /// Run until the session closes or a write fails.
    ///
    /// On exit the outbound queue is closed, whatever is still queued is
    /// discarded and the write side of the stream is shut down.
    ///
    /// When every [`crate::Session`] handle is dropped the queue is written
    /// out, the write side is shut down early and the pump idles until the
    /// session closes. The inbound direction is unaffected.
    pub(crate) async fn run(mut self) {
        let remote = self.shared.remote_addr.as_str();
        let mut write_side_open = true;

        loop {
            let packet = tokio::select! {
                biased;
                _ = self.shared.shutdown.cancelled() => break,
                packet = self.queue.recv() => packet,
            };

            let Some(packet) = packet else {
                debug!(remote, "outbound producers dropped; shutting down write side");
                if let Err(err) = self.writer.shutdown().await {
                    debug!(remote, error = %err, "stream shutdown failed");
                }
                write_side_open = false;
                self.shared.shutdown.cancelled().await;
                break;
            };

            let bytes = match catch_unwind(AssertUnwindSafe(|| self.codec.encode(&packet))) {
                Ok(bytes) => bytes,
                Err(payload) => {
                    error!(
                        remote,
                        panic = %panic_message(payload.as_ref()),
                        "codec panicked encoding packet; packet dropped"
                    );
                    continue;
                }
            };
            if bytes.is_empty() {
                debug!(remote, "skipping empty encoding");
                continue;
            }

            let written = tokio::select! {
                biased;
                _ = self.shared.shutdown.cancelled() => break,
                written = self.writer.write_frame(&bytes) => written,
            };
            if let Err(err) = written {
                warn!(remote, len = bytes.len(), error = %err, "write failed; closing session");
                self.shared.close();
                break;
            }
        }

        self.queue.close();
        let mut discarded = 0usize;
        while self.queue.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(remote, discarded, "dropped queued outbound packets");
        }

        if write_side_open {
            if let Err(err) = self.writer.shutdown().await {
                debug!(remote, error = %err, "stream shutdown failed");
            }
        }
        debug!(remote, "outbound pump exited");
    }
}

/// Wait for both pumps, turning a panicked or aborted pump into a close.
///
/// Codec panics are contained per frame inside the pumps; this catches
/// everything else.
pub(crate) async fn supervise(
    shared: Arc<Shared>,
    inbound: JoinHandle<()>,
    outbound: JoinHandle<()>,
) {
    tokio::join!(
        watch_pump(&shared, "inbound", inbound),
        watch_pump(&shared, "outbound", outbound),
    );
    shared.finished.cancel();
}

async fn watch_pump(shared: &Shared, pump: &'static str, task: JoinHandle<()>) {
    let Err(err) = task.await else {
        return;
    };

    match err.try_into_panic() {
        Ok(payload) => error!(
            remote = %shared.remote_addr,
            pump,
            panic = %panic_message(payload.as_ref()),
            "pump panicked; closing session"
        ),
        Err(_) => warn!(remote = %shared.remote_addr, pump, "pump cancelled; closing session"),
    }
    shared.close();
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
