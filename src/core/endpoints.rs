use crate::core::errors::ExchangeError;
use std::collections::HashMap;
use std::fmt;

/// Logical endpoint classes an exchange routes requests through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlKind {
    RestSpot,
    RestSandbox,
    WebsocketSpot,
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RestSpot => "RestSpotURL",
            Self::RestSandbox => "RestSandboxURL",
            Self::WebsocketSpot => "WebsocketSpotURL",
        };
        f.write_str(name)
    }
}

/// Routing table from endpoint class to base URL
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    exchange_name: String,
    urls: HashMap<UrlKind, String>,
}

impl Endpoints {
    pub fn new(exchange_name: impl Into<String>) -> Self {
        Self {
            exchange_name: exchange_name.into(),
            urls: HashMap::new(),
        }
    }

    /// Install defaults; entries already present are kept
    pub fn set_default_endpoints(&mut self, defaults: &[(UrlKind, &str)]) {
        for (kind, url) in defaults {
            self.urls
                .entry(*kind)
                .or_insert_with(|| (*url).to_string());
        }
    }

    /// Override a single endpoint
    pub fn set_running_url(&mut self, kind: UrlKind, url: impl Into<String>) {
        self.urls.insert(kind, url.into());
    }

    pub fn with_url(mut self, kind: UrlKind, url: impl Into<String>) -> Self {
        self.set_running_url(kind, url);
        self
    }

    /// Resolve the base URL for an endpoint class
    pub fn get_url(&self, kind: UrlKind) -> Result<&str, ExchangeError> {
        self.urls.get(&kind).map(String::as_str).ok_or_else(|| {
            ExchangeError::ConfigurationError(format!(
                "{} endpoint {} not set",
                self.exchange_name, kind
            ))
        })
    }

    pub fn contains(&self, kind: UrlKind) -> bool {
        self.urls.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mapping_is_configuration_error() {
        let endpoints = Endpoints::new("Crypto.com");
        let err = endpoints.get_url(UrlKind::RestSpot).unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(msg) if msg.contains("RestSpotURL")));
    }

    #[test]
    fn test_defaults_do_not_override_running_urls() {
        let mut endpoints = Endpoints::new("Crypto.com")
            .with_url(UrlKind::RestSpot, "http://127.0.0.1:9000/");
        endpoints.set_default_endpoints(&[
            (UrlKind::RestSpot, "https://api.crypto.com/v2/"),
            (UrlKind::WebsocketSpot, "wss://stream.crypto.com/v2/market"),
        ]);

        assert_eq!(
            endpoints.get_url(UrlKind::RestSpot).unwrap(),
            "http://127.0.0.1:9000/"
        );
        assert_eq!(
            endpoints.get_url(UrlKind::WebsocketSpot).unwrap(),
            "wss://stream.crypto.com/v2/market"
        );
    }
}
