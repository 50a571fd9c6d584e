use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    ConnectionState, HmacSigner, NonceSource, Signer, StreamEvent, WsConfig, WsConnection,
    WsDialer,
};
use crate::exchanges::cryptocom::codec::{
    decode_response, heartbeat_reply, CryptoComCodec, CryptoComMessage,
};
use crate::exchanges::cryptocom::types::{
    GenericResponse, Instrument, InstrumentResponse, WsRequest,
};
use crate::exchanges::cryptocom::{AUTH_METHOD, INSTRUMENTS};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Streaming feature switches taken from the exchange configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingFlags {
    /// The exchange adapter itself is enabled
    pub exchange_enabled: bool,
    /// Streaming is enabled for this connection
    pub websocket_enabled: bool,
    /// Authenticate right after connecting
    pub authenticated: bool,
    pub verbose: bool,
}

/// Crypto.com WebSocket client
pub struct CryptoComWebSocket<D: WsDialer> {
    connection: WsConnection<D, CryptoComCodec>,
    nonce: Arc<NonceSource>,
    signer: Option<HmacSigner>,
    flags: StreamingFlags,
    can_use_authenticated_endpoints: AtomicBool,
    exchange_name: String,
}

impl<D: WsDialer> CryptoComWebSocket<D> {
    pub fn new(
        url: String,
        exchange_name: String,
        dialer: D,
        config: WsConfig,
        nonce: Arc<NonceSource>,
        signer: Option<HmacSigner>,
        flags: StreamingFlags,
    ) -> Self {
        Self {
            connection: WsConnection::new(
                url,
                exchange_name.clone(),
                dialer,
                CryptoComCodec,
                config,
            ),
            nonce,
            signer,
            flags,
            can_use_authenticated_endpoints: AtomicBool::new(false),
            exchange_name,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.exchange_enabled && self.flags.websocket_enabled
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn can_use_authenticated_endpoints(&self) -> bool {
        self.can_use_authenticated_endpoints.load(Ordering::Acquire)
    }

    /// Single consumer end of the push/error channel
    pub fn take_data_receiver(&self) -> Option<mpsc::Receiver<StreamEvent<CryptoComMessage>>> {
        self.connection.take_data_receiver()
    }

    /// Connect, start reading, and authenticate when configured to
    ///
    /// A failed handshake leaves the connection up: the error is pushed onto
    /// the data channel and authenticated endpoints are switched off.
    #[instrument(skip(self), fields(exchange = %self.exchange_name))]
    pub async fn connect(&self) -> Result<(), ExchangeError> {
        if !self.is_enabled() {
            return Err(ExchangeError::WebSocketNotEnabled(format!(
                "{} websocket is disabled",
                self.exchange_name
            )));
        }

        self.connection.connect().await?;
        info!("websocket connected");

        if self.flags.authenticated {
            match self.authenticate().await {
                Ok(()) => {
                    self.can_use_authenticated_endpoints
                        .store(true, Ordering::Release);
                }
                Err(e) => {
                    warn!("websocket authentication failed: {}", e);
                    self.connection.report(e);
                    self.can_use_authenticated_endpoints
                        .store(false, Ordering::Release);
                }
            }
        }
        Ok(())
    }

    async fn authenticate(&self) -> Result<(), ExchangeError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::AuthError(format!(
                "{} websocket authentication without credentials set",
                self.exchange_name
            ))
        })?;

        let nonce = self.nonce.next();
        let id = request_id(nonce)?;
        let payload = format!("{}{}{}{}", AUTH_METHOD, id, signer.api_key(), nonce);
        let sig = signer.sign_message(payload.as_bytes())?;

        let request = WsRequest {
            id,
            method: AUTH_METHOD.to_string(),
            params: Map::new(),
            nonce: Some(nonce),
            api_key: Some(signer.api_key().to_string()),
            sig: Some(sig),
        };
        let _: GenericResponse = self.round_trip(&request).await?;
        debug!("websocket authenticated");
        Ok(())
    }

    /// Send a command and wait for its correlated response
    pub async fn send_command<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Map<String, Value>,
    ) -> Result<T, ExchangeError> {
        let nonce = self.nonce.next();
        let request = WsRequest {
            id: request_id(nonce)?,
            method: method.to_string(),
            params,
            nonce: Some(nonce),
            api_key: None,
            sig: None,
        };
        self.round_trip(&request).await
    }

    async fn round_trip<T: DeserializeOwned>(&self, request: &WsRequest) -> Result<T, ExchangeError> {
        let frame = serde_json::to_vec(request).map_err(|e| {
            ExchangeError::SerializationError(format!("Unable to serialize command: {}", e))
        })?;
        if self.flags.verbose {
            debug!("Sending websocket command: {}", String::from_utf8_lossy(&frame));
        }

        let response = self.connection.send_request(request.id, frame).await?;
        decode_response(&self.exchange_name, &response)
    }

    /// Instrument snapshot requested over the socket
    pub async fn get_ws_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let response: InstrumentResponse = self.send_command(INSTRUMENTS, Map::new()).await?;
        Ok(response.result.instruments)
    }

    /// Answer a server heartbeat explicitly
    ///
    /// The read loop already answers every heartbeat it sees; this is for
    /// callers that need to send one out of band.
    pub async fn respond_heartbeat(&self, id: u64) -> Result<(), ExchangeError> {
        let frame = heartbeat_reply(id).map_err(|e| {
            ExchangeError::SerializationError(format!("Unable to serialize heartbeat: {}", e))
        })?;
        self.connection.send_frame(frame).await
    }

    /// Stop the read loop and wait for it to exit
    pub async fn shutdown(&self) -> Result<(), ExchangeError> {
        self.can_use_authenticated_endpoints
            .store(false, Ordering::Release);
        self.connection.shutdown().await
    }

    pub async fn wait_until_closed(&self) {
        self.connection.wait_until_closed().await;
    }
}

fn request_id(nonce: i64) -> Result<u64, ExchangeError> {
    u64::try_from(nonce)
        .map_err(|_| ExchangeError::InvalidParameters(format!("negative nonce {}", nonce)))
}
