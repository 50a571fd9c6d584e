#![allow(dead_code)]

use async_trait::async_trait;
use cryptocom_connector::core::config::ExchangeConfig;
use cryptocom_connector::core::errors::ExchangeError;
use cryptocom_connector::core::kernel::{
    FrameReader, FrameWriter, HttpRequest, HttpRequester, HttpResponse, WsConfig, WsDialer,
};
use cryptocom_connector::exchanges::cryptocom::CryptoComBuilder;
use cryptocom_connector::CryptoComConnector;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Records every request and answers from a script
#[derive(Clone, Default)]
pub struct MockRequester {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<Result<HttpResponse, ExchangeError>>,
    requests: Vec<HttpRequest>,
}

impl MockRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(&self, body: &str) {
        self.respond_status(200, body);
    }

    pub fn respond_status(&self, status: u16, body: &str) {
        self.state.lock().unwrap().responses.push_back(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn fail(&self, error: ExchangeError) {
        self.state.lock().unwrap().responses.push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_bodies(&self) -> Vec<Value> {
        self.requests()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

#[async_trait]
impl HttpRequester for MockRequester {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ExchangeError::NetworkError("no scripted response".into())))
    }
}

pub struct ChannelReader {
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

pub struct ChannelWriter {
    sent: mpsc::UnboundedSender<Vec<u8>>,
}

#[async_trait]
impl FrameWriter for ChannelWriter {
    async fn send_frame(&mut self, frame: Vec<u8>) -> Result<(), ExchangeError> {
        self.sent
            .send(frame)
            .map_err(|_| ExchangeError::NetworkError("server gone".into()))
    }

    async fn close(&mut self) -> Result<(), ExchangeError> {
        Ok(())
    }
}

/// Hands out one in-memory socket and counts dial attempts
pub struct ChannelDialer {
    dials: Arc<AtomicUsize>,
    halves: Mutex<Option<(ChannelWriter, ChannelReader)>>,
}

#[async_trait]
impl WsDialer for ChannelDialer {
    type Reader = ChannelReader;
    type Writer = ChannelWriter;

    async fn dial(&self, _url: &str) -> Result<(ChannelWriter, ChannelReader), ExchangeError> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        self.halves
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ExchangeError::NetworkError("dial refused".into()))
    }
}

/// Server end of the in-memory socket
pub struct MockServer {
    pub to_client: mpsc::UnboundedSender<Vec<u8>>,
    pub from_client: mpsc::UnboundedReceiver<Vec<u8>>,
    pub reads: Arc<AtomicUsize>,
    pub dials: Arc<AtomicUsize>,
}

pub fn channel_dialer() -> (ChannelDialer, MockServer) {
    let (to_client, frames) = mpsc::unbounded_channel();
    let (sent, from_client) = mpsc::unbounded_channel();
    let reads = Arc::new(AtomicUsize::new(0));
    let dials = Arc::new(AtomicUsize::new(0));
    let dialer = ChannelDialer {
        dials: Arc::clone(&dials),
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
        MockServer {
            to_client,
            from_client,
            reads,
            dials,
        },
    )
}

/// Answer each client frame with `reply`; resolves to every frame seen once
/// the client side closes
pub fn spawn_responder<F>(
    mut from_client: mpsc::UnboundedReceiver<Vec<u8>>,
    to_client: mpsc::UnboundedSender<Vec<u8>>,
    mut reply: F,
) -> JoinHandle<Vec<Value>>
where
    F: FnMut(&Value) -> Option<Value> + Send + 'static,
{
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(frame) = from_client.recv().await {
            let request: Value = serde_json::from_slice(&frame).unwrap();
            if let Some(response) = reply(&request) {
                let _ = to_client.send(serde_json::to_vec(&response).unwrap());
            }
            seen.push(request);
        }
        seen
    })
}

pub const INSTRUMENTS_RESULT: &str = r#"{"instruments":[
    {"instrument_name":"BTC_USDT","quote_curency":"USDT","base_currency":"BTC",
     "price_decimals":2,"quantity_decimals":6,"margin_trading_enabled":true},
    {"instrument_name":"CRO_BTC","quote_curency":"BTC","base_currency":"CRO",
     "price_decimals":8,"quantity_decimals":2,"margin_trading_enabled":false}]}"#;

pub fn instruments_body() -> String {
    format!(
        r#"{{"code":0,"method":"public/get-instruments","id":1,"result":{}}}"#,
        INSTRUMENTS_RESULT
    )
}

pub fn instruments_reply(id: &Value) -> Value {
    let result: Value = serde_json::from_str(INSTRUMENTS_RESULT).unwrap();
    serde_json::json!({
        "id": id,
        "method": "public/get-instruments",
        "code": 0,
        "result": result,
    })
}

pub fn credentials_config() -> ExchangeConfig {
    ExchangeConfig::new("key-1".to_string(), "s3cr3t".to_string()).client_id("client-7".to_string())
}

pub fn test_connector(
    config: ExchangeConfig,
    requester: MockRequester,
    dialer: ChannelDialer,
) -> CryptoComConnector<MockRequester, ChannelDialer> {
    CryptoComBuilder::new(config)
        .with_ws_config(WsConfig::default().with_response_timeout(Duration::from_secs(2)))
        .build_with(requester, dialer)
        .unwrap()
}
