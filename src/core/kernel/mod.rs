//! Exchange-agnostic transport layer.
//!
//! The kernel holds everything a connector needs that does not depend on a
//! particular exchange's wire format:
//!
//! - [`NonceSource`]: strictly increasing request nonces
//! - [`Signer`] / [`HmacSigner`]: HMAC-SHA256 over the exact bytes sent
//! - [`HttpRequester`] / [`ReqwestRequester`]: the HTTP transport, with rate
//!   limiting and transport-level retries
//! - [`WsDialer`] / [`TungsteniteDialer`]: the socket transport
//! - [`WsCodec`]: the exchange-specific view of inbound frames
//! - [`WsConnection`]: connection lifecycle, the read loop, and command
//!   correlation
//!
//! # Example
//! ```rust,no_run
//! use cryptocom_connector::core::kernel::*;
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let requester = RestClientBuilder::new(RestClientConfig::new("Crypto.com".to_string())).build()?;
//! let response = requester
//!     .send(HttpRequest {
//!         method: Method::POST,
//!         url: "https://api.crypto.com/v2/public/get-instruments".to_string(),
//!         headers: HashMap::new(),
//!         body: br#"{"method":"public/get-instruments","nonce":1}"#.to_vec(),
//!     })
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&response.body));
//! # Ok(())
//! # }
//! ```
pub mod codec;
pub mod connection;
pub mod nonce;
pub mod rest;
pub mod signer;
pub mod ws;

pub use codec::WsCodec;
pub use connection::{ConnectionState, StreamEvent, WsConnection};
pub use nonce::NonceSource;
pub use rest::{
    HttpRequest, HttpRequester, HttpResponse, Method, ReqwestRequester, RestClientBuilder,
    RestClientConfig,
};
pub use signer::{hmac_sha256_hex, HmacSigner, SignatureResult, Signer};
pub use ws::{FrameReader, FrameWriter, TungsteniteDialer, WsConfig, WsDialer};
