use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
pub use reqwest::Method;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{instrument, trace, warn};

/// Default request budget for a single exchange
pub const DEFAULT_REQUESTS_PER_SECOND: NonZeroU32 = nonzero!(20u32);

/// Transport-level request description
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

/// Raw transport response; status is informational, the body is authoritative
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport collaborator
///
/// Implementations own timeouts, TLS, rate limiting and retries. The request
/// pipeline above hands over a fully built request and gets back the raw body
/// or a transport error.
///
/// Retries resend the request byte for byte. A signed body goes out again with
/// the nonce it was signed with, so the exchange may answer a retry with
/// error 10007 (invalid nonce).
#[async_trait]
pub trait HttpRequester: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError>;
}

#[async_trait]
impl<T: HttpRequester + ?Sized> HttpRequester for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        (**self).send(request).await
    }
}

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries after a transport failure
    pub max_retries: u32,
    /// Base delay of the exponential backoff, in milliseconds
    pub retry_base_delay_ms: u64,
    /// Outbound request budget
    pub requests_per_second: NonZeroU32,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            timeout: Duration::from_secs(15),
            max_retries: 3,
            retry_base_delay_ms: 100,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            user_agent: "cryptocom-connector/0.1".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the outbound request budget
    pub fn with_rate_limit(mut self, requests_per_second: NonZeroU32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for the reqwest-backed transport
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestRequester, ExchangeError> {
        let client = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        let limiter = RateLimiter::direct(Quota::per_second(self.config.requests_per_second));

        Ok(ReqwestRequester {
            client,
            config: self.config,
            limiter: Arc::new(limiter),
        })
    }
}

/// `HttpRequester` on top of reqwest with rate limiting and transport retries
///
/// Only `NetworkError` is retried, and always with the original body.
#[derive(Clone)]
pub struct ReqwestRequester {
    client: Client,
    config: RestClientConfig,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for ReqwestRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRequester")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRequester {
    pub fn new(exchange_name: String) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::new(exchange_name)).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ExchangeError> {
        self.limiter.until_ready().await;

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .body(request.body.clone());
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!(status, "Response body: {}", String::from_utf8_lossy(&body));

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl HttpRequester for ReqwestRequester {
    #[instrument(skip(self, request), fields(exchange = %self.config.exchange_name, method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ExchangeError> {
        let strategy = ExponentialBackoff::from_millis(self.config.retry_base_delay_ms)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.config.max_retries as usize);

        RetryIf::spawn(
            strategy,
            || self.execute(&request),
            |e: &ExchangeError| {
                let retry = matches!(e, ExchangeError::NetworkError(_));
                if retry {
                    warn!("Transport failure, retrying: {}", e);
                }
                retry
            },
        )
        .await
    }
}
