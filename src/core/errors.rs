use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The exchange answered with a non-success envelope code.
    #[error("API error: {code} - {message}")]
    ApiError { code: i64, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Websocket not enabled: {0}")]
    WebSocketNotEnabled(String),

    #[error("Not yet implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid orderbook: {0}")]
    InvalidOrderBook(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// True when the connector has no implementation for the operation, as
    /// opposed to the exchange rejecting it.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Transport failure that says nothing about the request itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::ConnectionTimeout(_))
    }

    /// Envelope code carried by a protocol failure.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}
