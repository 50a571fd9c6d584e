use crate::core::endpoints::UrlKind;
use crate::core::types::PairFormat;

pub mod builder;
pub mod codec;
pub mod connector;
pub mod conversions;
pub mod rest;
pub mod types;
pub mod websocket;

pub use builder::{build_connector, CryptoComBuilder};
pub use codec::{CryptoComCodec, CryptoComMessage};
pub use connector::{Account, CryptoComConnector, MarketData, Trading};
pub use rest::CryptoComRest;
pub use types::{GenericResponse, Instrument, InstrumentResponse, ResponseCode, WsRequest};
pub use websocket::CryptoComWebSocket;

pub const EXCHANGE_NAME: &str = "Crypto.com";

pub const DEFAULT_REST_URL: &str = "https://api.crypto.com/v2/";
pub const DEFAULT_SANDBOX_URL: &str = "https://uat-api.3ona.co/v2/";
pub const DEFAULT_WS_URL: &str = "wss://stream.crypto.com/v2/market";

/// Instrument names are `BASE_QUOTE`, upper case
pub const REQUEST_PAIR_FORMAT: PairFormat = PairFormat::new(true, "_");

// Public endpoints
pub const INSTRUMENTS: &str = "public/get-instruments";
pub const TICKER: &str = "public/get-ticker";
pub const BOOK: &str = "public/get-book";

// Authenticated endpoints
pub const WITHDRAWAL_HISTORY: &str = "private/get-withdrawal-history";

// WebSocket methods
pub const AUTH_METHOD: &str = "public/auth";
pub const HEARTBEAT_METHOD: &str = "public/heartbeat";
pub const RESPOND_HEARTBEAT_METHOD: &str = "public/respond-heartbeat";

/// Default orderbook depth requested by `update_orderbook`
pub const DEFAULT_BOOK_DEPTH: u32 = 150;

pub(crate) fn default_endpoints() -> [(UrlKind, &'static str); 3] {
    [
        (UrlKind::RestSpot, DEFAULT_REST_URL),
        (UrlKind::RestSandbox, DEFAULT_SANDBOX_URL),
        (UrlKind::WebsocketSpot, DEFAULT_WS_URL),
    ]
}
