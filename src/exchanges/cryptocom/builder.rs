use crate::core::cache::MarketCache;
use crate::core::config::ExchangeConfig;
use crate::core::endpoints::{Endpoints, UrlKind};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    HmacSigner, HttpRequester, NonceSource, ReqwestRequester, RestClientBuilder,
    RestClientConfig, TungsteniteDialer, WsConfig, WsDialer,
};
use crate::exchanges::cryptocom::connector::{CryptoComConnector, MarketData};
use crate::exchanges::cryptocom::rest::CryptoComRest;
use crate::exchanges::cryptocom::websocket::{CryptoComWebSocket, StreamingFlags};
use crate::exchanges::cryptocom::{default_endpoints, EXCHANGE_NAME};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Builder for Crypto.com connectors
///
/// Wires the shared nonce source, the signer, the routing table and the
/// market cache into the REST and WebSocket clients. The transports default to
/// reqwest and tokio-tungstenite; `build_with` takes any other pair.
pub struct CryptoComBuilder {
    config: ExchangeConfig,
    cache: Option<Arc<MarketCache>>,
    ws_config: Option<WsConfig>,
    requests_per_second: Option<NonZeroU32>,
    max_retries: u32,
    verify_orderbook: bool,
}

impl Default for CryptoComBuilder {
    fn default() -> Self {
        Self::new(ExchangeConfig::read_only())
    }
}

impl CryptoComBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            cache: None,
            ws_config: None,
            requests_per_second: None,
            max_retries: 3,
            verify_orderbook: true,
        }
    }

    /// Share a cache with other connectors instead of creating one
    pub fn with_cache(mut self, cache: Arc<MarketCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_ws_config(mut self, ws_config: WsConfig) -> Self {
        self.ws_config = Some(ws_config);
        self
    }

    pub fn with_rate_limit(mut self, requests_per_second: NonZeroU32) -> Self {
        self.requests_per_second = Some(requests_per_second);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_orderbook_verification(mut self, verify: bool) -> Self {
        self.verify_orderbook = verify;
        self
    }

    /// Build with the reqwest and tokio-tungstenite transports
    pub fn build(
        self,
    ) -> Result<CryptoComConnector<ReqwestRequester, TungsteniteDialer>, ExchangeError> {
        let mut rest_config = RestClientConfig::new(EXCHANGE_NAME.to_string())
            .with_timeout(self.config.http_timeout)
            .with_max_retries(self.max_retries);
        if let Some(rps) = self.requests_per_second {
            rest_config = rest_config.with_rate_limit(rps);
        }
        let requester = RestClientBuilder::new(rest_config).build()?;
        let dialer = TungsteniteDialer::new(self.websocket_config());
        self.build_with(requester, dialer)
    }

    /// Build on caller-supplied transports
    pub fn build_with<H: HttpRequester, D: WsDialer>(
        self,
        requester: H,
        dialer: D,
    ) -> Result<CryptoComConnector<H, D>, ExchangeError> {
        let endpoints = self.endpoints();
        let ws_url = endpoints.get_url(UrlKind::WebsocketSpot)?.to_string();
        let ws_config = self.websocket_config();

        let signer = self.config.has_credentials().then(|| {
            HmacSigner::new(
                self.config.client_id_str().to_string(),
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            )
        });
        let rest_signer = if self.config.authenticated_support {
            signer.clone()
        } else {
            None
        };
        let nonce = Arc::new(NonceSource::new());
        let rest_endpoint = if self.config.testnet {
            UrlKind::RestSandbox
        } else {
            UrlKind::RestSpot
        };

        let rest = Arc::new(
            CryptoComRest::new(
                requester,
                endpoints,
                rest_signer,
                Arc::clone(&nonce),
                EXCHANGE_NAME.to_string(),
                self.config.verbose,
            )
            .with_rest_endpoint(rest_endpoint),
        );

        let flags = StreamingFlags {
            exchange_enabled: self.config.enabled,
            websocket_enabled: self.config.websocket_enabled,
            authenticated: self.config.authenticated_websocket_support,
            verbose: self.config.verbose,
        };
        let ws = CryptoComWebSocket::new(
            ws_url,
            EXCHANGE_NAME.to_string(),
            dialer,
            ws_config,
            nonce,
            signer,
            flags,
        );

        let cache = self.cache.unwrap_or_default();
        let market = MarketData::new(
            Arc::clone(&rest),
            cache,
            self.verify_orderbook,
            EXCHANGE_NAME.to_string(),
        );

        Ok(CryptoComConnector::new(
            EXCHANGE_NAME.to_string(),
            rest,
            ws,
            market,
            self.config.auto_pair_updates,
            self.config.verbose,
        ))
    }

    fn websocket_config(&self) -> WsConfig {
        self.ws_config.clone().unwrap_or_else(|| {
            WsConfig::default().with_response_timeout(self.config.websocket_response_timeout)
        })
    }

    fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::new(EXCHANGE_NAME);
        if let Some(base_url) = &self.config.base_url {
            endpoints.set_running_url(UrlKind::RestSpot, base_url.as_str());
            endpoints.set_running_url(UrlKind::RestSandbox, base_url.as_str());
        }
        if let Some(ws_url) = &self.config.ws_url {
            endpoints.set_running_url(UrlKind::WebsocketSpot, ws_url.as_str());
        }
        endpoints.set_default_endpoints(&default_endpoints());
        endpoints
    }
}

/// Build a connector with the default transports
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<CryptoComConnector<ReqwestRequester, TungsteniteDialer>, ExchangeError> {
    CryptoComBuilder::new(config).build()
}
