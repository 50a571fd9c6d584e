use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::time::Duration;

/// Default HTTP timeout applied to REST requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);
/// Default time a correlated WebSocket request waits for its response
pub const DEFAULT_WEBSOCKET_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub client_id: Secret<String>,
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub ws_url: Option<String>,
    pub enabled: bool,
    pub verbose: bool,
    pub authenticated_support: bool,
    pub authenticated_websocket_support: bool,
    pub websocket_enabled: bool,
    pub auto_pair_updates: bool,
    pub http_timeout: Duration,
    pub websocket_response_timeout: Duration,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 13)?;
        state.serialize_field("client_id", "[REDACTED]")?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("ws_url", &self.ws_url)?;
        state.serialize_field("enabled", &self.enabled)?;
        state.serialize_field("verbose", &self.verbose)?;
        state.serialize_field("authenticated_support", &self.authenticated_support)?;
        state.serialize_field(
            "authenticated_websocket_support",
            &self.authenticated_websocket_support,
        )?;
        state.serialize_field("websocket_enabled", &self.websocket_enabled)?;
        state.serialize_field("auto_pair_updates", &self.auto_pair_updates)?;
        state.serialize_field("http_timeout_secs", &self.http_timeout.as_secs())?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            #[serde(default)]
            client_id: String,
            api_key: String,
            secret_key: String,
            #[serde(default)]
            testnet: bool,
            base_url: Option<String>,
            ws_url: Option<String>,
            #[serde(default = "default_true")]
            enabled: bool,
            #[serde(default)]
            verbose: bool,
            authenticated_support: Option<bool>,
            #[serde(default)]
            authenticated_websocket_support: bool,
            #[serde(default)]
            websocket_enabled: bool,
            #[serde(default = "default_true")]
            auto_pair_updates: bool,
            http_timeout_secs: Option<u64>,
        }

        const fn default_true() -> bool {
            true
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        let has_credentials = !helper.api_key.is_empty() && !helper.secret_key.is_empty();
        Ok(Self {
            client_id: Secret::new(helper.client_id),
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            testnet: helper.testnet,
            base_url: helper.base_url,
            ws_url: helper.ws_url,
            enabled: helper.enabled,
            verbose: helper.verbose,
            authenticated_support: helper
                .authenticated_support
                .unwrap_or(has_credentials),
            authenticated_websocket_support: helper.authenticated_websocket_support,
            websocket_enabled: helper.websocket_enabled,
            auto_pair_updates: helper.auto_pair_updates,
            http_timeout: helper
                .http_timeout_secs
                .map_or(DEFAULT_HTTP_TIMEOUT, Duration::from_secs),
            websocket_response_timeout: DEFAULT_WEBSOCKET_RESPONSE_TIMEOUT,
        })
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::read_only()
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    ///
    /// Authenticated REST support is switched on when both key and secret are present.
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        let authenticated_support = !api_key.is_empty() && !secret_key.is_empty();
        Self {
            client_id: Secret::new(String::new()),
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet: false,
            base_url: None,
            ws_url: None,
            enabled: true,
            verbose: false,
            authenticated_support,
            authenticated_websocket_support: false,
            websocket_enabled: false,
            auto_pair_updates: true,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            websocket_response_timeout: DEFAULT_WEBSOCKET_RESPONSE_TIMEOUT,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `CRYPTO_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `CRYPTO_SECRET_KEY`)
    /// - `{EXCHANGE}_CLIENT_ID` (optional, sent as `X-USER`)
    /// - `{EXCHANGE}_TESTNET` (optional, defaults to false)
    /// - `{EXCHANGE}_BASE_URL` (optional)
    /// - `{EXCHANGE}_WS_URL` (optional)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let client_id = env::var(format!("{}_CLIENT_ID", prefix)).unwrap_or_default();

        let testnet = env::var(format!("{}_TESTNET", prefix))
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let mut config = Self::new(api_key, secret_key)
            .client_id(client_id)
            .testnet(testnet);
        config.base_url = env::var(format!("{}_BASE_URL", prefix)).ok();
        config.ws_url = env::var(format!("{}_WS_URL", prefix)).ok();

        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Create configuration for read-only operations (market data only)
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set custom WebSocket URL
    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    /// Set the client identifier sent with signed requests
    #[must_use]
    pub fn client_id(mut self, client_id: String) -> Self {
        self.client_id = Secret::new(client_id);
        self
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub const fn websocket(mut self, enabled: bool) -> Self {
        self.websocket_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn authenticated_websocket(mut self, supported: bool) -> Self {
        self.authenticated_websocket_support = supported;
        self
    }

    #[must_use]
    pub const fn auto_pair_updates(mut self, enabled: bool) -> Self {
        self.auto_pair_updates = enabled;
        self
    }

    #[must_use]
    pub const fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn websocket_response_timeout(mut self, timeout: Duration) -> Self {
        self.websocket_response_timeout = timeout;
        self
    }

    /// Get client identifier (use carefully - exposes secret)
    pub fn client_id_str(&self) -> &str {
        self.client_id.expose_secret()
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
