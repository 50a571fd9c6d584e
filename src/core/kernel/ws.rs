use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, instrument, warn};

type TungsteniteStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connection settings
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Time allowed for the TCP + TLS + upgrade handshake
    pub connect_timeout: Duration,
    /// Time a correlated command waits for its response
    pub response_timeout: Duration,
    /// Capacity of the push/error data channel
    pub channel_capacity: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(30),
            channel_capacity: 1024,
        }
    }
}

impl WsConfig {
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Read half of a socket
#[async_trait]
pub trait FrameReader: Send + 'static {
    /// Next data frame, or `None` once the connection is closed
    async fn read_frame(&mut self) -> Option<Vec<u8>>;
}

/// Write half of a socket
#[async_trait]
pub trait FrameWriter: Send + 'static {
    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), ExchangeError>;

    async fn close(&mut self) -> Result<(), ExchangeError>;
}

/// Opens socket connections
#[async_trait]
pub trait WsDialer: Send + Sync + 'static {
    type Reader: FrameReader;
    type Writer: FrameWriter;

    async fn dial(&self, url: &str) -> Result<(Self::Writer, Self::Reader), ExchangeError>;
}

/// Dialer backed by tokio-tungstenite
#[derive(Debug, Clone, Default)]
pub struct TungsteniteDialer {
    config: WsConfig,
}

impl TungsteniteDialer {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }
}

pub struct TungsteniteReader {
    stream: SplitStream<TungsteniteStream>,
}

pub struct TungsteniteWriter {
    sink: SplitSink<TungsteniteStream, Message>,
}

#[async_trait]
impl WsDialer for TungsteniteDialer {
    type Reader = TungsteniteReader;
    type Writer = TungsteniteWriter;

    #[instrument(skip(self), fields(url = %url))]
    async fn dial(&self, url: &str) -> Result<(Self::Writer, Self::Reader), ExchangeError> {
        let (ws_stream, _) = tokio::time::timeout(self.config.connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                ExchangeError::ConnectionTimeout("WebSocket connection timeout".to_string())
            })?
            .map_err(|e| {
                ExchangeError::NetworkError(format!("WebSocket connection failed: {}", e))
            })?;

        debug!("WebSocket connected");
        let (sink, stream) = ws_stream.split();
        Ok((TungsteniteWriter { sink }, TungsteniteReader { stream }))
    }
}

#[async_trait]
impl FrameReader for TungsteniteReader {
    async fn read_frame(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(text.into_bytes()),
                Ok(Message::Binary(data)) => return Some(data),
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Close(frame)) => {
                    debug!("WebSocket closed by remote: {:?}", frame);
                    return None;
                }
                Err(e) => {
                    warn!("WebSocket read failed: {}", e);
                    return None;
                }
            }
        }
    }
}

#[async_trait]
impl FrameWriter for TungsteniteWriter {
    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), ExchangeError> {
        let message = match String::from_utf8(frame) {
            Ok(text) => Message::Text(text),
            Err(e) => Message::Binary(e.into_bytes()),
        };
        self.sink
            .send(message)
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Failed to send message: {}", e)))
    }

    async fn close(&mut self) -> Result<(), ExchangeError> {
        self.sink
            .close()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Failed to close WebSocket: {}", e)))
    }
}
