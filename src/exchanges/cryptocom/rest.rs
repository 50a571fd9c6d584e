use crate::core::endpoints::{Endpoints, UrlKind};
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HmacSigner, HttpRequest, HttpRequester, Method, NonceSource, Signer};
use crate::exchanges::cryptocom::codec::decode_response;
use crate::exchanges::cryptocom::types::{
    BookData, BookResponse, Instrument, InstrumentResponse, TickerData, TickerResponse,
    WithdrawalEntry, WithdrawalHistoryResponse,
};
use crate::exchanges::cryptocom::{BOOK, INSTRUMENTS, TICKER, WITHDRAWAL_HISTORY};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Signed REST pipeline for Crypto.com
///
/// Every call is a POST of a JSON object carrying the caller's parameters plus
/// `nonce` and `request`. Authenticated calls are signed over the serialized
/// body exactly as it is sent.
pub struct CryptoComRest<H: HttpRequester> {
    requester: H,
    endpoints: Endpoints,
    rest_endpoint: UrlKind,
    signer: Option<HmacSigner>,
    nonce: Arc<NonceSource>,
    exchange_name: String,
    verbose: bool,
}

impl<H: HttpRequester> std::fmt::Debug for CryptoComRest<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoComRest")
            .field("exchange_name", &self.exchange_name)
            .field("endpoints", &self.endpoints)
            .field("rest_endpoint", &self.rest_endpoint)
            .field("authenticated", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: HttpRequester> CryptoComRest<H> {
    /// `signer` is `None` when authenticated REST support is off
    pub fn new(
        requester: H,
        endpoints: Endpoints,
        signer: Option<HmacSigner>,
        nonce: Arc<NonceSource>,
        exchange_name: String,
        verbose: bool,
    ) -> Self {
        Self {
            requester,
            endpoints,
            rest_endpoint: UrlKind::RestSpot,
            signer,
            nonce,
            exchange_name,
            verbose,
        }
    }

    /// Route the endpoint methods through another REST class, such as the sandbox
    pub fn with_rest_endpoint(mut self, kind: UrlKind) -> Self {
        self.rest_endpoint = kind;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn rest_endpoint(&self) -> UrlKind {
        self.rest_endpoint
    }

    pub fn is_authenticated(&self) -> bool {
        self.signer.is_some()
    }

    /// Send one request through the pipeline and decode its result
    #[instrument(skip(self, params), fields(exchange = %self.exchange_name, request = api_request))]
    pub async fn send_request<T: DeserializeOwned>(
        &self,
        endpoint: UrlKind,
        api_request: &str,
        params: Option<&Map<String, Value>>,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let signer = if authenticated {
            Some(self.signer.as_ref().ok_or_else(|| {
                ExchangeError::ConfigurationError(format!(
                    "{} authenticated request {} sent without credentials set",
                    self.exchange_name, api_request
                ))
            })?)
        } else {
            None
        };

        let base_url = self.endpoints.get_url(endpoint)?;

        let mut payload = params.cloned().unwrap_or_default();
        payload.insert("nonce".to_string(), json!(self.nonce.next()));
        payload.insert("request".to_string(), json!(api_request));

        let body = serde_json::to_vec(&payload).map_err(|e| {
            ExchangeError::SerializationError(format!("Unable to serialize request: {}", e))
        })?;

        if self.verbose {
            debug!("Request JSON: {}", String::from_utf8_lossy(&body));
        }

        let mut headers = match signer {
            Some(signer) => signer.sign_request(&body)?,
            None => std::collections::HashMap::new(),
        };
        headers.insert(
            CONTENT_TYPE_HEADER.to_string(),
            JSON_CONTENT_TYPE.to_string(),
        );

        let response = self
            .requester
            .send(HttpRequest {
                method: Method::POST,
                url: join_url(base_url, api_request),
                headers,
                body,
            })
            .await?;

        if self.verbose {
            debug!(
                status = response.status,
                "Response JSON: {}",
                String::from_utf8_lossy(&response.body)
            );
        }

        decode_response(&self.exchange_name, &response.body)
    }

    /// All instruments listed on the exchange
    pub async fn get_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let response: InstrumentResponse = self
            .send_request(self.rest_endpoint, INSTRUMENTS, None, false)
            .await?;
        Ok(response.result.instruments)
    }

    pub async fn get_ticker(&self, instrument_name: &str) -> Result<TickerData, ExchangeError> {
        let mut params = Map::new();
        params.insert("instrument_name".to_string(), json!(instrument_name));

        let response: TickerResponse = self
            .send_request(self.rest_endpoint, TICKER, Some(&params), false)
            .await?;

        response
            .result
            .data
            .into_vec()
            .into_iter()
            .find(|t| t.instrument_name == instrument_name)
            .ok_or_else(|| {
                ExchangeError::DeserializationError(format!(
                    "no ticker for {} in response",
                    instrument_name
                ))
            })
    }

    pub async fn get_book(
        &self,
        instrument_name: &str,
        depth: u32,
    ) -> Result<BookData, ExchangeError> {
        let mut params = Map::new();
        params.insert("instrument_name".to_string(), json!(instrument_name));
        params.insert("depth".to_string(), json!(depth));

        let response: BookResponse = self
            .send_request(self.rest_endpoint, BOOK, Some(&params), false)
            .await?;

        response.result.data.into_iter().next().ok_or_else(|| {
            ExchangeError::InvalidOrderBook(format!("empty book for {}", instrument_name))
        })
    }

    /// Withdrawal history, optionally filtered by currency
    pub async fn get_withdrawal_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Vec<WithdrawalEntry>, ExchangeError> {
        let mut params = Map::new();
        if let Some(currency) = currency {
            params.insert("currency".to_string(), json!(currency));
        }

        let response: WithdrawalHistoryResponse = self
            .send_request(self.rest_endpoint, WITHDRAWAL_HISTORY, Some(&params), true)
            .await?;
        Ok(response.result.withdrawal_list)
    }
}

fn join_url(base: &str, api_request: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), api_request)
}
