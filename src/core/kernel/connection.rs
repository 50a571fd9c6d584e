use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::WsCodec;
use crate::core::kernel::ws::{FrameReader, FrameWriter, WsConfig, WsDialer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

/// Lifecycle of a single socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    ShuttingDown,
}

/// Item delivered on the data channel
///
/// Decode failures arrive as `Error` and never stop the read loop.
#[derive(Debug)]
pub enum StreamEvent<M> {
    Message(M),
    Error(ExchangeError),
}

// Correlation slots for outstanding commands. `closed` is flipped by the read
// loop on exit, under the same lock that drains the slots, so a command either
// gets a slot that will be dropped or sees `closed` and fails immediately.
struct Pending {
    closed: bool,
    slots: HashMap<u64, oneshot::Sender<Vec<u8>>>,
}

type PendingMap = Arc<Mutex<Pending>>;

type SharedWriter<W> = Arc<tokio::sync::Mutex<Option<W>>>;

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct Session {
    cancel: CancellationToken,
    reader_task: JoinHandle<()>,
}

/// One persistent WebSocket connection with a dedicated read loop.
///
/// Frames that answer an outstanding command are routed to the waiting
/// caller by correlation id; everything else goes to the data channel in
/// socket order. Any number of commands can be outstanding at once, and
/// waiting for a response never blocks the read loop.
///
/// The read loop never waits on the data channel: when it is full, or nobody
/// has taken the receiver yet and it has filled up, new events are dropped
/// and logged. Keepalive frames the codec knows how to answer are answered
/// from the read loop itself.
pub struct WsConnection<D: WsDialer, C: WsCodec> {
    url: String,
    exchange_name: String,
    dialer: D,
    codec: Arc<C>,
    config: WsConfig,
    state: Arc<watch::Sender<ConnectionState>>,
    pending: PendingMap,
    writer: SharedWriter<D::Writer>,
    session: Mutex<Option<Session>>,
    data_tx: mpsc::Sender<StreamEvent<C::Message>>,
    data_rx: Mutex<Option<mpsc::Receiver<StreamEvent<C::Message>>>>,
}

impl<D: WsDialer, C: WsCodec> WsConnection<D, C> {
    pub fn new(url: String, exchange_name: String, dialer: D, codec: C, config: WsConfig) -> Self {
        let (data_tx, data_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            url,
            exchange_name,
            dialer,
            codec: Arc::new(codec),
            config,
            state: Arc::new(state),
            pending: Arc::new(Mutex::new(Pending {
                closed: true,
                slots: HashMap::new(),
            })),
            writer: Arc::new(tokio::sync::Mutex::new(None)),
            session: Mutex::new(None),
            data_tx,
            data_rx: Mutex::new(Some(data_rx)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Hand out the single consumer end of the data channel
    pub fn take_data_receiver(&self) -> Option<mpsc::Receiver<StreamEvent<C::Message>>> {
        self.data_rx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }

    /// Dial and start the read loop
    #[instrument(skip(self), fields(exchange = %self.exchange_name, url = %self.url))]
    pub async fn connect(&self) -> Result<(), ExchangeError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == ConnectionState::Disconnected {
                *state = ConnectionState::Connecting;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(ExchangeError::InvalidParameters(format!(
                "{} websocket is not disconnected ({:?})",
                self.exchange_name,
                self.state()
            )));
        }

        let (writer, reader) = match self.dialer.dial(&self.url).await {
            Ok(halves) => halves,
            Err(e) => {
                self.state.send_replace(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        *self.writer.lock().await = Some(writer);
        {
            let mut pending = lock(&self.pending);
            pending.closed = false;
            pending.slots.clear();
        }

        let cancel = CancellationToken::new();
        let reader_task = tokio::spawn(read_loop(
            reader,
            Arc::clone(&self.writer),
            Arc::clone(&self.codec),
            Arc::clone(&self.pending),
            self.data_tx.clone(),
            Arc::clone(&self.state),
            cancel.clone(),
        ));
        *self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(Session {
            cancel,
            reader_task,
        });

        // The loop may already have seen the remote close; only promote a
        // connection that is still mid-handshake.
        self.state.send_if_modified(|state| {
            if *state == ConnectionState::Connecting {
                *state = ConnectionState::Connected;
                true
            } else {
                false
            }
        });
        debug!("read loop started");
        Ok(())
    }

    /// Send a command frame and wait for the frame carrying the same id
    pub async fn send_request(&self, id: u64, frame: Vec<u8>) -> Result<Vec<u8>, ExchangeError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = lock(&self.pending);
            if pending.closed {
                return Err(ExchangeError::ConnectionClosed(format!(
                    "{} websocket is not connected",
                    self.exchange_name
                )));
            }
            if pending.slots.contains_key(&id) {
                return Err(ExchangeError::InvalidParameters(format!(
                    "request id {} is already outstanding",
                    id
                )));
            }
            pending.slots.insert(id, tx);
        }

        if let Err(e) = self.send_frame(frame).await {
            lock(&self.pending).slots.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.config.response_timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ExchangeError::ConnectionClosed(format!(
                "connection closed before response to request {}",
                id
            ))),
            Err(_) => {
                lock(&self.pending).slots.remove(&id);
                Err(ExchangeError::ConnectionTimeout(format!(
                    "no response to request {} within {:?}",
                    id, self.config.response_timeout
                )))
            }
        }
    }

    /// Send a frame without waiting for a response
    pub async fn send_frame(&self, frame: Vec<u8>) -> Result<(), ExchangeError> {
        let mut writer = self.writer.lock().await;
        match writer.as_mut() {
            Some(writer) => writer.send_frame(frame).await,
            None => Err(ExchangeError::ConnectionClosed(format!(
                "{} websocket is not connected",
                self.exchange_name
            ))),
        }
    }

    /// Push an error onto the data channel
    pub fn report(&self, error: ExchangeError) {
        if let Err(e) = self.data_tx.try_send(StreamEvent::Error(error)) {
            warn!(exchange = %self.exchange_name, "Could not report websocket error: {}", e);
        }
    }

    /// Stop the read loop, wait for it to exit and close the socket
    #[instrument(skip(self), fields(exchange = %self.exchange_name))]
    pub async fn shutdown(&self) -> Result<(), ExchangeError> {
        let session = self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();

        if let Some(session) = session {
            self.state.send_if_modified(|state| {
                if *state == ConnectionState::Connected {
                    *state = ConnectionState::ShuttingDown;
                    true
                } else {
                    false
                }
            });
            session.cancel.cancel();
            if let Err(e) = session.reader_task.await {
                warn!("read loop terminated abnormally: {}", e);
                close_pending(&self.pending);
                self.state.send_replace(ConnectionState::Disconnected);
            }
        }

        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.close().await {
                debug!("close after shutdown failed: {}", e);
            }
        }
        Ok(())
    }

    /// Resolves once no read loop is running
    pub async fn wait_until_closed(&self) {
        let mut state = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = state
            .wait_for(|state| *state == ConnectionState::Disconnected)
            .await;
    }
}

fn close_pending(pending: &Mutex<Pending>) {
    let mut pending = lock(pending);
    pending.closed = true;
    let dropped = pending.slots.len();
    pending.slots.clear();
    if dropped > 0 {
        debug!(dropped, "failing outstanding requests");
    }
}

async fn answer_keepalive<W: FrameWriter>(
    writer: &tokio::sync::Mutex<Option<W>>,
    reply: Vec<u8>,
) {
    let mut writer = writer.lock().await;
    match writer.as_mut() {
        Some(writer) => {
            if let Err(e) = writer.send_frame(reply).await {
                warn!("Failed to answer keepalive: {}", e);
            }
        }
        None => trace!("writer already closed, keepalive not answered"),
    }
}

async fn read_loop<R: FrameReader, W: FrameWriter, C: WsCodec>(
    mut reader: R,
    writer: SharedWriter<W>,
    codec: Arc<C>,
    pending: PendingMap,
    data_tx: mpsc::Sender<StreamEvent<C::Message>>,
    state: Arc<watch::Sender<ConnectionState>>,
    cancel: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            frame = reader.read_frame() => frame,
        };
        let Some(frame) = frame else {
            debug!("websocket stream ended");
            break;
        };

        if let Some(id) = codec.correlation_id(&frame) {
            let slot = lock(&pending).slots.remove(&id);
            if let Some(slot) = slot {
                if slot.send(frame).is_err() {
                    trace!(id, "requester went away before its response");
                }
                continue;
            }
        }

        if let Some(reply) = codec.keepalive_reply(&frame) {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = answer_keepalive(&writer, reply) => {}
            }
        }

        let event = match codec.decode_message(&frame) {
            Ok(Some(message)) => StreamEvent::Message(message),
            Ok(None) => continue,
            Err(e) => {
                warn!("Failed to decode websocket frame: {}", e);
                StreamEvent::Error(e)
            }
        };

        match data_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("data channel full, dropping websocket event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                trace!("data receiver dropped, discarding event");
            }
        }
    }

    close_pending(&pending);
    state.send_replace(ConnectionState::Disconnected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ChannelReader {
        frames: mpsc::UnboundedReceiver<Vec<u8>>,
        reads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FrameReader for ChannelReader {
        async fn read_frame(&mut self) -> Option<Vec<u8>> {
            let frame = self.frames.recv().await;
            self.reads.fetch_add(1, Ordering::SeqCst);
            frame
        }
    }

    struct ChannelWriter {
        sent: mpsc::UnboundedSender<Vec<u8>>,
    }

    #[async_trait]
    impl FrameWriter for ChannelWriter {
        async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), ExchangeError> {
            self.sent
                .send(frame)
                .map_err(|_| ExchangeError::NetworkError("peer gone".to_string()))
        }

        async fn close(&mut self) -> Result<(), ExchangeError> {
            Ok(())
        }
    }

    struct Server {
        to_client: mpsc::UnboundedSender<Vec<u8>>,
        from_client: mpsc::UnboundedReceiver<Vec<u8>>,
        reads: Arc<AtomicUsize>,
    }

    struct ChannelDialer {
        halves: Mutex<Option<(ChannelWriter, ChannelReader)>>,
    }

    #[async_trait]
    impl WsDialer for ChannelDialer {
        type Reader = ChannelReader;
        type Writer = ChannelWriter;

        async fn dial(&self, _url: &str) -> Result<(ChannelWriter, ChannelReader), ExchangeError> {
            self.halves
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| ExchangeError::NetworkError("dial refused".to_string()))
        }
    }

    fn channel_dialer() -> (ChannelDialer, Server) {
        let (to_client, frames) = mpsc::unbounded_channel();
        let (sent, from_client) = mpsc::unbounded_channel();
        let reads = Arc::new(AtomicUsize::new(0));
        let dialer = ChannelDialer {
            halves: Mutex::new(Some((
                ChannelWriter { sent },
                ChannelReader {
                    frames,
                    reads: Arc::clone(&reads),
                },
            ))),
        };
        (
            dialer,
            Server {
                to_client,
                from_client,
                reads,
            },
        )
    }

    struct JsonCodec;

    impl WsCodec for JsonCodec {
        type Message = serde_json::Value;

        fn correlation_id(&self, frame: &[u8]) -> Option<u64> {
            serde_json::from_slice::<serde_json::Value>(frame)
                .ok()?
                .get("id")?
                .as_u64()
        }

        fn decode_message(&self, frame: &[u8]) -> Result<Option<Self::Message>, ExchangeError> {
            serde_json::from_slice(frame)
                .map(Some)
                .map_err(|e| ExchangeError::DeserializationError(e.to_string()))
        }

        fn keepalive_reply(&self, frame: &[u8]) -> Option<Vec<u8>> {
            let value: serde_json::Value = serde_json::from_slice(frame).ok()?;
            let ping = value.get("ping")?;
            Some(serde_json::json!({ "pong": ping }).to_string().into_bytes())
        }
    }

    fn connection(
        dialer: ChannelDialer,
        response_timeout: Duration,
    ) -> WsConnection<ChannelDialer, JsonCodec> {
        WsConnection::new(
            "ws://mock".to_string(),
            "mock".to_string(),
            dialer,
            JsonCodec,
            WsConfig::default().with_response_timeout(response_timeout),
        )
    }

    #[tokio::test]
    async fn test_connect_and_shutdown_lifecycle() {
        let (dialer, server) = channel_dialer();
        let conn = connection(dialer, Duration::from_secs(5));
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        conn.connect().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert!(conn.connect().await.is_err());

        tokio::time::timeout(Duration::from_secs(1), conn.shutdown())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        let reads_after_shutdown = server.reads.load(Ordering::SeqCst);
        // the reader is gone, so this may fail; it must not be read either way
        let _ = server.to_client.send(br#"{"late":true}"#.to_vec());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(server.reads.load(Ordering::SeqCst), reads_after_shutdown);
        conn.wait_until_closed().await;
    }

    #[tokio::test]
    async fn test_dial_failure_returns_to_disconnected() {
        let (dialer, _server) = channel_dialer();
        let conn = connection(dialer, Duration::from_secs(5));
        conn.connect().await.unwrap();
        conn.shutdown().await.unwrap();

        // the mock dialer only hands out one socket
        assert!(matches!(
            conn.connect().await,
            Err(ExchangeError::NetworkError(_))
        ));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_correlated_response_is_routed_to_caller() {
        let (dialer, mut server) = channel_dialer();
        let conn = Arc::new(connection(dialer, Duration::from_secs(5)));
        let mut data = conn.take_data_receiver().unwrap();
        conn.connect().await.unwrap();

        let request = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(7, br#"{"id":7}"#.to_vec()).await })
        };

        let sent = server.from_client.recv().await.unwrap();
        assert_eq!(sent, br#"{"id":7}"#.to_vec());
        server
            .to_client
            .send(br#"{"id":7,"result":"ok"}"#.to_vec())
            .unwrap();

        let response = request.await.unwrap().unwrap();
        assert_eq!(response, br#"{"id":7,"result":"ok"}"#.to_vec());
        assert!(data.try_recv().is_err());
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_requests_resolve_out_of_order() {
        let (dialer, mut server) = channel_dialer();
        let conn = Arc::new(connection(dialer, Duration::from_secs(5)));
        conn.connect().await.unwrap();

        let first = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(1, br#"{"id":1}"#.to_vec()).await })
        };
        let second = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(2, br#"{"id":2}"#.to_vec()).await })
        };

        server.from_client.recv().await.unwrap();
        server.from_client.recv().await.unwrap();
        server
            .to_client
            .send(br#"{"id":2,"n":"second"}"#.to_vec())
            .unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(second, br#"{"id":2,"n":"second"}"#.to_vec());

        server
            .to_client
            .send(br#"{"id":1,"n":"first"}"#.to_vec())
            .unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, br#"{"id":1,"n":"first"}"#.to_vec());
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_pending_request_fails_when_remote_closes() {
        let (dialer, mut server) = channel_dialer();
        let conn = Arc::new(connection(dialer, Duration::from_secs(30)));
        conn.connect().await.unwrap();

        let request = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(9, br#"{"id":9}"#.to_vec()).await })
        };
        server.from_client.recv().await.unwrap();
        drop(server.to_client);

        let result = tokio::time::timeout(Duration::from_secs(1), request)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ExchangeError::ConnectionClosed(_))));
        conn.wait_until_closed().await;
        assert!(matches!(
            conn.send_request(10, b"{}".to_vec()).await,
            Err(ExchangeError::ConnectionClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_pending_request_fails_on_shutdown() {
        let (dialer, mut server) = channel_dialer();
        let conn = Arc::new(connection(dialer, Duration::from_secs(30)));
        conn.connect().await.unwrap();

        let request = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(3, br#"{"id":3}"#.to_vec()).await })
        };
        server.from_client.recv().await.unwrap();
        conn.shutdown().await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), request)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ExchangeError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn test_request_times_out_without_response() {
        let (dialer, _server) = channel_dialer();
        let conn = connection(dialer, Duration::from_millis(50));
        conn.connect().await.unwrap();

        let result = conn.send_request(4, br#"{"id":4}"#.to_vec()).await;
        assert!(matches!(result, Err(ExchangeError::ConnectionTimeout(_))));
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_frame_is_reported_and_stream_continues() {
        let (dialer, server) = channel_dialer();
        let conn = connection(dialer, Duration::from_secs(5));
        let mut data = conn.take_data_receiver().unwrap();
        assert!(conn.take_data_receiver().is_none());
        conn.connect().await.unwrap();

        server.to_client.send(br#"{"seq":1}"#.to_vec()).unwrap();
        server.to_client.send(b"not json".to_vec()).unwrap();
        server.to_client.send(br#"{"seq":2}"#.to_vec()).unwrap();

        match data.recv().await.unwrap() {
            StreamEvent::Message(value) => assert_eq!(value["seq"], 1),
            StreamEvent::Error(e) => panic!("unexpected error {}", e),
        }
        assert!(matches!(
            data.recv().await.unwrap(),
            StreamEvent::Error(ExchangeError::DeserializationError(_))
        ));
        match data.recv().await.unwrap() {
            StreamEvent::Message(value) => assert_eq!(value["seq"], 2),
            StreamEvent::Error(e) => panic!("unexpected error {}", e),
        }
        assert!(conn.is_connected());
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_is_not_blocked_by_full_data_channel() {
        let (dialer, server) = channel_dialer();
        let conn = WsConnection::new(
            "ws://mock".to_string(),
            "mock".to_string(),
            dialer,
            JsonCodec,
            WsConfig::default().with_channel_capacity(1),
        );
        let _data = conn.take_data_receiver().unwrap();
        conn.connect().await.unwrap();

        for seq in 0..4 {
            server
                .to_client
                .send(format!(r#"{{"seq":{}}}"#, seq).into_bytes())
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(1), conn.shutdown())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_untaken_data_channel_does_not_stall_responses() {
        let (dialer, mut server) = channel_dialer();
        let conn = Arc::new(WsConnection::new(
            "ws://mock".to_string(),
            "mock".to_string(),
            dialer,
            JsonCodec,
            WsConfig::default()
                .with_channel_capacity(1)
                .with_response_timeout(Duration::from_secs(2)),
        ));
        conn.connect().await.unwrap();

        for seq in 0..4 {
            server
                .to_client
                .send(format!(r#"{{"seq":{}}}"#, seq).into_bytes())
                .unwrap();
        }
        while server.reads.load(Ordering::SeqCst) < 4 {
            tokio::task::yield_now().await;
        }

        let request = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.send_request(9, br#"{"id":9}"#.to_vec()).await })
        };
        assert_eq!(server.from_client.recv().await.unwrap(), br#"{"id":9}"#.to_vec());
        server.to_client.send(br#"{"id":9,"result":1}"#.to_vec()).unwrap();

        let response = request.await.unwrap().unwrap();
        assert_eq!(response, br#"{"id":9,"result":1}"#.to_vec());

        // only the first push fit; the rest were dropped
        let mut data = conn.take_data_receiver().unwrap();
        assert!(matches!(data.try_recv(), Ok(StreamEvent::Message(_))));
        assert!(data.try_recv().is_err());
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_keepalive_is_answered_by_read_loop() {
        let (dialer, mut server) = channel_dialer();
        let conn = connection(dialer, Duration::from_secs(5));
        let mut data = conn.take_data_receiver().unwrap();
        conn.connect().await.unwrap();

        server.to_client.send(br#"{"ping":5}"#.to_vec()).unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(1), server.from_client.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, br#"{"pong":5}"#.to_vec());

        match data.recv().await.unwrap() {
            StreamEvent::Message(value) => assert_eq!(value["ping"], 5),
            StreamEvent::Error(e) => panic!("unexpected error {}", e),
        }
        conn.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_report_reaches_data_channel() {
        let (dialer, _server) = channel_dialer();
        let conn = connection(dialer, Duration::from_secs(5));
        let mut data = conn.take_data_receiver().unwrap();

        conn.report(ExchangeError::AuthError("handshake rejected".to_string()));
        assert!(matches!(
            data.recv().await.unwrap(),
            StreamEvent::Error(ExchangeError::AuthError(_))
        ));
    }
}
