use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use remoting_frame::{FrameAccumulator, FrameWriter, PacketCodec};
use remoting_transport::configure_stream;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::pump::{supervise, InboundPump, OutboundPump};

/// Lifecycle state shared by both pumps and every [`Session`] handle.
pub(crate) struct Shared {
    pub(crate) remote_addr: String,
    closed: AtomicBool,
    /// Fired once, by the caller that wins the Open -> Closed transition.
    pub(crate) shutdown: CancellationToken,
    /// Fired once both pumps have exited.
    pub(crate) finished: CancellationToken,
}

impl Shared {
    fn new(remote_addr: String) -> Self {
        Self {
            remote_addr,
            closed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            finished: CancellationToken::new(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Transition Open -> Closed. Returns `true` only for the winning caller.
    ///
    /// Waking the pumps releases the connection and both queues: the
    /// outbound pump closes its queue and shuts the stream down, the inbound
    /// pump drops the inbound sender. Each happens once, in the pump that
    /// owns the resource.
    pub(crate) fn close(&self) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.shutdown.cancel();
        info!(remote = %self.remote_addr, "session closed");
        true
    }
}

/// Handle to one live connection.
///
/// Cloning is cheap; every clone refers to the same session. The inbound
/// direction is consumed through the [`Inbound`] returned alongside the
/// first handle.
pub struct Session<P> {
    shared: Arc<Shared>,
    outbound: mpsc::Sender<P>,
}

impl<P: Send + 'static> Session<P> {
    /// Start a session over `stream` on the current tokio runtime.
    ///
    /// The stream is split between an inbound pump (frames -> `codec.decode`
    /// -> [`Inbound`]) and an outbound pump ([`Session::submit`] ->
    /// `codec.encode` -> stream). The session owns the stream from here on.
    pub fn spawn<T, C>(
        stream: T,
        remote_addr: impl Into<String>,
        codec: C,
        config: SessionConfig,
    ) -> (Self, Inbound<P>)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
        C: PacketCodec<Packet = P>,
    {
        let capacity = config.effective_queue_capacity();
        let shared = Arc::new(Shared::new(remote_addr.into()));
        let codec = Arc::new(codec);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
        let (read_half, write_half) = tokio::io::split(stream);

        let inbound = InboundPump::new(
            Arc::clone(&shared),
            FrameAccumulator::with_config(read_half, config.frame),
            Arc::clone(&codec),
            inbound_tx,
        );
        let outbound = OutboundPump::new(
            Arc::clone(&shared),
            FrameWriter::new(write_half),
            codec,
            outbound_rx,
        );

        let inbound_task = tokio::spawn(inbound.run());
        let outbound_task = tokio::spawn(outbound.run());
        tokio::spawn(supervise(Arc::clone(&shared), inbound_task, outbound_task));

        info!(remote = %shared.remote_addr, capacity, "session opened");

        (
            Self {
                shared,
                outbound: outbound_tx,
            },
            Inbound { rx: inbound_rx },
        )
    }

    /// Start a session over an established TCP stream.
    ///
    /// Applies the configured keep-alive and no-delay options and records the
    /// peer address before spawning the pumps.
    pub fn from_tcp<C>(
        stream: TcpStream,
        codec: C,
        config: SessionConfig,
    ) -> Result<(Self, Inbound<P>)>
    where
        C: PacketCodec<Packet = P>,
    {
        configure_stream(&stream, &config.tcp)?;
        let remote = stream.peer_addr()?;
        Ok(Self::spawn(stream, remote.to_string(), codec, config))
    }

    /// Queue a packet for the outbound pump.
    ///
    /// Waits while the outbound queue is full. Once the session is closed,
    /// including while waiting, the packet is dropped and this returns
    /// immediately.
    pub async fn submit(&self, packet: P) {
        if self.shared.is_closed() {
            trace!(remote = %self.shared.remote_addr, "session closed; dropping packet");
            return;
        }

        tokio::select! {
            biased;
            _ = self.shared.shutdown.cancelled() => {
                trace!(remote = %self.shared.remote_addr, "session closed while queueing; dropping packet");
            }
            sent = self.outbound.send(packet) => {
                if sent.is_err() {
                    trace!(remote = %self.shared.remote_addr, "outbound queue closed; dropping packet");
                }
            }
        }
    }

    /// Queue a packet without waiting.
    ///
    /// Returns `false` when the packet was dropped because the session is
    /// closed or the outbound queue is full.
    pub fn try_submit(&self, packet: P) -> bool {
        if self.shared.is_closed() {
            return false;
        }
        self.outbound.try_send(packet).is_ok()
    }
}

impl<P> Session<P> {
    /// Close the session. Idempotent and safe to call concurrently.
    ///
    /// Returns `true` for the single call that performed the close.
    pub fn close(&self) -> bool {
        self.shared.close()
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Wait until the session is closed.
    pub async fn closed(&self) {
        self.shared.shutdown.cancelled().await;
    }

    /// Wait until both pumps have exited and released the connection.
    pub async fn join(&self) {
        self.shared.finished.cancelled().await;
    }

    /// Address of the remote peer.
    pub fn remote_addr(&self) -> &str {
        &self.shared.remote_addr
    }
}

impl<P> Clone for Session<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            outbound: self.outbound.clone(),
        }
    }
}

impl<P> fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("remote_addr", &self.shared.remote_addr)
            .field("closed", &self.shared.is_closed())
            .finish()
    }
}

/// Ordered stream of decoded inbound packets.
///
/// Yields `None` once the session has closed and every queued packet has
/// been received.
pub struct Inbound<P> {
    rx: mpsc::Receiver<P>,
}

impl<P> Inbound<P> {
    /// Receive the next packet, waiting while the queue is empty.
    pub async fn recv(&mut self) -> Option<P> {
        self.rx.recv().await
    }

    /// Receive a packet if one is already queued.
    pub fn try_recv(&mut self) -> Option<P> {
        self.rx.try_recv().ok()
    }

    /// Number of packets waiting in the queue.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<P> Stream for Inbound<P> {
    type Item = P;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<P>> {
        self.rx.poll_recv(cx)
    }
}

impl<P> fmt::Debug for Inbound<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inbound").field("queued", &self.rx.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::io;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    use bytes::Bytes;
    use futures_util::StreamExt;
    use remoting_frame::{CodecError, FrameConfig, TlvCodec};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, ReadBuf};

    use super::*;

    /// Frames starting with `!` fail to decode, `?` decode to nothing and
    /// `P` panic. Everything else decodes to its own bytes. Encoding `skip`
    /// yields nothing and encoding `panic` panics.
    #[derive(Default, Clone)]
    struct RecordingCodec {
        decoded: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl RecordingCodec {
        fn decode_calls(&self) -> Vec<Vec<u8>> {
            self.decoded.lock().unwrap().clone()
        }
    }

    impl PacketCodec for RecordingCodec {
        type Packet = Vec<u8>;

        fn decode(&self, frame: &[u8]) -> std::result::Result<Option<Vec<u8>>, CodecError> {
            self.decoded.lock().unwrap().push(frame.to_vec());
            match frame.first() {
                Some(b'!') => Err(CodecError::Invalid("bang".to_string())),
                Some(b'?') => Ok(None),
                Some(b'P') => panic!("codec fault"),
                _ => Ok(Some(frame.to_vec())),
            }
        }

        fn encode(&self, packet: &Vec<u8>) -> Bytes {
            match packet.as_slice() {
                b"skip" => return Bytes::new(),
                b"panic" => panic!("encode fault"),
                _ => {}
            }
            let mut wire = packet.clone();
            wire.extend_from_slice(b"\r\n");
            Bytes::from(wire)
        }
    }

    fn test_config() -> SessionConfig {
        SessionConfig::default().with_frame_config(FrameConfig {
            header_len: 2,
            ..FrameConfig::default()
        })
    }

    fn start(codec: RecordingCodec) -> (Session<Vec<u8>>, Inbound<Vec<u8>>, DuplexStream) {
        let (local, peer) = tokio::io::duplex(4096);
        let (session, inbound) = Session::spawn(local, "test-peer", codec, test_config());
        (session, inbound, peer)
    }

    async fn within<F: Future>(fut: F) -> F::Output {
        tokio::time::timeout(Duration::from_secs(5), fut)
            .await
            .expect("operation should finish in time")
    }

    #[tokio::test]
    async fn single_frame_decoded_once_and_delivered() {
        let codec = RecordingCodec::default();
        let (session, mut inbound, mut peer) = start(codec.clone());

        peer.write_all(b"AB\r\n").await.unwrap();

        let packet = within(inbound.recv()).await.unwrap();
        assert_eq!(packet, b"AB\r\n");
        assert_eq!(codec.decode_calls(), vec![b"AB\r\n".to_vec()]);
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn bare_delimiter_produces_nothing() {
        let codec = RecordingCodec::default();
        let (session, mut inbound, mut peer) = start(codec.clone());

        peer.write_all(b"\r\n").await.unwrap();
        peer.write_all(b"next\r\n").await.unwrap();

        assert_eq!(within(inbound.recv()).await.unwrap(), b"next\r\n");
        assert_eq!(codec.decode_calls(), vec![b"next\r\n".to_vec()]);
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn decode_failures_are_dropped_and_pumping_continues() {
        let codec = RecordingCodec::default();
        let (session, mut inbound, mut peer) = start(codec.clone());

        peer.write_all(b"!corrupt\r\n?empty\r\ngood\r\n").await.unwrap();

        assert_eq!(within(inbound.recv()).await.unwrap(), b"good\r\n");
        assert_eq!(codec.decode_calls().len(), 3);
        assert!(inbound.is_empty());
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn inbound_order_matches_wire_order() {
        let (_session, mut inbound, mut peer) = start(RecordingCodec::default());

        let writer = tokio::spawn(async move {
            for i in 0..200 {
                peer.write_all(format!("msg-{i}\r\n").as_bytes()).await.unwrap();
            }
            peer
        });

        for i in 0..200 {
            let packet = within(inbound.recv()).await.unwrap();
            assert_eq!(packet, format!("msg-{i}\r\n").into_bytes());
        }
        let _peer = writer.await.unwrap();
    }

    #[tokio::test]
    async fn outbound_order_matches_submit_order() {
        let (session, _inbound, peer) = start(RecordingCodec::default());

        session.submit(b"P1".to_vec()).await;
        session.submit(b"P2".to_vec()).await;
        session.submit(b"P3".to_vec()).await;

        let mut frames = FrameAccumulator::with_config(peer, test_config().frame);
        assert_eq!(within(frames.next_frame()).await.unwrap(), b"P1\r\n");
        assert_eq!(within(frames.next_frame()).await.unwrap(), b"P2\r\n");
        assert_eq!(within(frames.next_frame()).await.unwrap(), b"P3\r\n");
    }

    #[tokio::test]
    async fn empty_encoding_is_skipped() {
        let (session, _inbound, peer) = start(RecordingCodec::default());

        session.submit(b"skip".to_vec()).await;
        session.submit(b"kept".to_vec()).await;

        let mut frames = FrameAccumulator::with_config(peer, test_config().frame);
        assert_eq!(within(frames.next_frame()).await.unwrap(), b"kept\r\n");
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn concurrent_close_has_single_winner() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));
        let (local, mut peer) = tokio::io::duplex(1024);
        let stream = TrackedStream {
            inner: local,
            shutdowns: Arc::clone(&shutdowns),
            drops: Arc::clone(&drops),
        };
        let (session, mut inbound) =
            Session::spawn(stream, "tracked", RecordingCodec::default(), test_config());

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let session = session.clone();
            tasks.push(tokio::spawn(async move { session.close() }));
        }
        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert!(!session.close());
        assert!(session.is_closed());

        within(session.join()).await;
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(within(inbound.recv()).await.is_none());

        let mut rest = Vec::new();
        within(peer.read_to_end(&mut rest)).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn submit_after_close_never_reaches_wire() {
        let (session, _inbound, mut peer) = start(RecordingCodec::default());

        assert!(session.close());
        within(session.submit(b"late".to_vec())).await;
        assert!(!session.try_submit(b"later".to_vec()));
        within(session.join()).await;

        let mut rest = Vec::new();
        within(peer.read_to_end(&mut rest)).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn read_error_closes_session_and_releases_outbound_pump() {
        let stream = FaultyReadStream {
            bytes: b"AB\r\n".to_vec(),
            pos: 0,
        };
        let (session, mut inbound) =
            Session::spawn(stream, "faulty", RecordingCodec::default(), test_config());

        within(session.closed()).await;
        within(session.join()).await;
        assert!(session.is_closed());

        assert_eq!(within(inbound.recv()).await.unwrap(), b"AB\r\n");
        assert!(within(inbound.recv()).await.is_none());
    }

    #[tokio::test]
    async fn peer_eof_closes_session() {
        let (session, mut inbound, peer) = start(RecordingCodec::default());
        drop(peer);

        within(session.closed()).await;
        assert!(within(inbound.recv()).await.is_none());
    }

    #[tokio::test]
    async fn write_failure_closes_session() {
        let (session, mut inbound) = Session::spawn(
            BrokenWriteStream,
            "broken",
            RecordingCodec::default(),
            test_config(),
        );

        session.submit(b"doomed".to_vec()).await;

        within(session.closed()).await;
        within(session.join()).await;
        assert!(within(inbound.recv()).await.is_none());
    }

    #[tokio::test]
    async fn blocked_submit_released_by_close() {
        let (session, _inbound) = Session::spawn(
            StalledStream,
            "stalled",
            RecordingCodec::default(),
            test_config().with_queue_capacity(1),
        );

        let producer = {
            let session = session.clone();
            tokio::spawn(async move {
                for i in 0..8u8 {
                    session.submit(vec![b'x', i]).await;
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        session.close();
        within(producer).await.unwrap();
        within(session.join()).await;
    }

    #[tokio::test]
    async fn decode_panic_drops_only_that_frame() {
        let codec = RecordingCodec::default();
        let (session, mut inbound, mut peer) = start(codec.clone());

        peer.write_all(b"PANIC\r\ngood\r\n").await.unwrap();

        assert_eq!(within(inbound.recv()).await.unwrap(), b"good\r\n");
        assert_eq!(codec.decode_calls().len(), 2);
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn encode_panic_drops_only_that_packet() {
        let (session, _inbound, peer) = start(RecordingCodec::default());

        session.submit(b"panic".to_vec()).await;
        session.submit(b"after".to_vec()).await;

        let mut frames = FrameAccumulator::with_config(peer, test_config().frame);
        assert_eq!(within(frames.next_frame()).await.unwrap(), b"after\r\n");
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn oversized_frame_closes_session() {
        let (local, mut peer) = tokio::io::duplex(4096);
        let (session, mut inbound) = Session::spawn(
            local,
            "oversized",
            RecordingCodec::default(),
            test_config().with_max_frame_len(Some(16)),
        );

        peer.write_all(&[b'x'; 64]).await.unwrap();

        within(session.closed()).await;
        assert!(session.is_closed());
        assert!(within(inbound.recv()).await.is_none());
        within(session.join()).await;
    }

    #[tokio::test]
    async fn dropping_handles_flushes_and_half_closes() {
        let (session, mut inbound, mut peer) = start(RecordingCodec::default());
        session.submit(b"last".to_vec()).await;
        drop(session);

        let mut written = Vec::new();
        within(peer.read_to_end(&mut written)).await.unwrap();
        assert_eq!(written, b"last\r\n");

        peer.write_all(b"still-here\r\n").await.unwrap();
        assert_eq!(within(inbound.recv()).await.unwrap(), b"still-here\r\n");

        drop(peer);
        assert!(within(inbound.recv()).await.is_none());
    }

    #[tokio::test]
    async fn inbound_is_a_stream() {
        let (session, inbound, mut peer) = start(RecordingCodec::default());

        peer.write_all(b"one\r\ntwo\r\n").await.unwrap();
        drop(peer);

        let packets: Vec<Vec<u8>> = within(inbound.collect()).await;
        assert_eq!(packets, vec![b"one\r\n".to_vec(), b"two\r\n".to_vec()]);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn tlv_packets_round_trip_through_session() {
        let (local, peer) = tokio::io::duplex(4096);
        let (session, mut inbound) =
            Session::spawn(local, "tlv", TlvCodec, SessionConfig::default());
        let (echo, mut echo_inbound) =
            Session::spawn(peer, "tlv-peer", TlvCodec, SessionConfig::default());

        for opaque in 0..10u32 {
            session
                .submit(remoting_frame::Packet::new(opaque, 2, format!("body-{opaque}")))
                .await;
        }
        for opaque in 0..10u32 {
            let packet = within(echo_inbound.recv()).await.unwrap();
            assert_eq!(packet.opaque, opaque);
            assert_eq!(packet.data, Bytes::from(format!("body-{opaque}")));
            echo.submit(packet).await;
        }
        for opaque in 0..10u32 {
            assert_eq!(within(inbound.recv()).await.unwrap().opaque, opaque);
        }

        assert_eq!(session.remote_addr(), "tlv");
        assert!(format!("{session:?}").contains("closed: false"));
    }

    struct TrackedStream {
        inner: DuplexStream,
        shutdowns: Arc<AtomicUsize>,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for TrackedStream {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl AsyncRead for TrackedStream {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.inner).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for TrackedStream {
        fn poll_write(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Pin::new(&mut self.inner).poll_write(cx, buf)
        }

        fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Pin::new(&mut self.inner).poll_flush(cx)
        }

        fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Pin::new(&mut self.inner).poll_shutdown(cx)
        }
    }

    /// Yields `bytes`, then fails every read with `ConnectionReset`.
    struct FaultyReadStream {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl AsyncRead for FaultyReadStream {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.pos >= self.bytes.len() {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
            }
            let n = (self.bytes.len() - self.pos).min(buf.remaining());
            let start = self.pos;
            buf.put_slice(&self.bytes[start..start + n]);
            self.pos += n;
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for FaultyReadStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Never yields data; every write fails with `BrokenPipe`.
    struct BrokenWriteStream;

    impl AsyncRead for BrokenWriteStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Pending
        }
    }

    impl AsyncWrite for BrokenWriteStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Never yields data and never accepts a write.
    struct StalledStream;

    impl AsyncRead for StalledStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Pending
        }
    }

    impl AsyncWrite for StalledStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Pending
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Pending
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }
}
