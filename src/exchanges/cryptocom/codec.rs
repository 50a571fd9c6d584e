use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::WsCodec;
use crate::exchanges::cryptocom::types::{GenericResponse, ResponseCode, WsRequest, SUCCESS_CODE};
use crate::exchanges::cryptocom::{HEARTBEAT_METHOD, RESPOND_HEARTBEAT_METHOD};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Push messages delivered on the data channel
#[derive(Debug, Clone, PartialEq)]
pub enum CryptoComMessage {
    /// Server heartbeat, already answered by the read loop
    Heartbeat { id: u64 },
    /// Subscription update
    Subscription {
        channel: String,
        instrument_name: Option<String>,
        data: Value,
    },
    /// Any other well-formed frame
    Other(Value),
}

#[derive(Deserialize)]
struct FrameHeader {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    nonce: Option<Value>,
    #[serde(default)]
    method: Option<String>,
}

fn as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// `public/respond-heartbeat` frame echoing the heartbeat id
pub(crate) fn heartbeat_reply(id: u64) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&WsRequest {
        id,
        method: RESPOND_HEARTBEAT_METHOD.to_string(),
        params: Map::new(),
        nonce: None,
        api_key: None,
        sig: None,
    })
}

/// Frame codec for the Crypto.com socket
#[derive(Debug, Clone, Default)]
pub struct CryptoComCodec;

impl WsCodec for CryptoComCodec {
    type Message = CryptoComMessage;

    fn correlation_id(&self, frame: &[u8]) -> Option<u64> {
        let header: FrameHeader = serde_json::from_slice(frame).ok()?;
        if header.method.as_deref() == Some(HEARTBEAT_METHOD) {
            return None;
        }
        header
            .id
            .as_ref()
            .and_then(as_id)
            .or_else(|| header.nonce.as_ref().and_then(as_id))
    }

    fn decode_message(&self, frame: &[u8]) -> Result<Option<Self::Message>, ExchangeError> {
        let value: Value = serde_json::from_slice(frame).map_err(|e| {
            ExchangeError::DeserializationError(format!("Invalid websocket frame: {}", e))
        })?;

        let method = value.get("method").and_then(Value::as_str);
        if method == Some(HEARTBEAT_METHOD) {
            let id = value.get("id").and_then(as_id).ok_or_else(|| {
                ExchangeError::DeserializationError("heartbeat without id".to_string())
            })?;
            return Ok(Some(CryptoComMessage::Heartbeat { id }));
        }

        if let Some(code) = value.get("code").and_then(Value::as_i64) {
            if code != SUCCESS_CODE {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Err(api_error(code, message));
            }
        }

        if method == Some("subscribe") {
            if let Some(result) = value.get("result") {
                let channel = result
                    .get("channel")
                    .or_else(|| result.get("subscription"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let instrument_name = result
                    .get("instrument_name")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let data = result.get("data").cloned().unwrap_or(Value::Null);
                return Ok(Some(CryptoComMessage::Subscription {
                    channel,
                    instrument_name,
                    data,
                }));
            }
        }

        Ok(Some(CryptoComMessage::Other(value)))
    }

    fn keepalive_reply(&self, frame: &[u8]) -> Option<Vec<u8>> {
        let header: FrameHeader = serde_json::from_slice(frame).ok()?;
        if header.method.as_deref() != Some(HEARTBEAT_METHOD) {
            return None;
        }
        let id = header.id.as_ref().and_then(as_id)?;
        match heartbeat_reply(id) {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("Unable to serialize heartbeat reply: {}", e);
                None
            }
        }
    }
}

pub(crate) fn api_error(code: i64, message: &str) -> ExchangeError {
    let message = if message.is_empty() {
        ResponseCode::from_code(code)
            .map_or("unknown error", ResponseCode::description)
            .to_string()
    } else {
        message.to_string()
    };
    ExchangeError::ApiError { code, message }
}

/// Decode a raw response: envelope first, then the typed payload
///
/// A non-success envelope code is returned as `ApiError` and the payload is
/// never decoded. On success the same bytes are decoded a second time into
/// `T`, since the result sits next to the envelope fields in one object.
pub fn decode_response<T: DeserializeOwned>(
    exchange_name: &str,
    raw: &[u8],
) -> Result<T, ExchangeError> {
    let envelope: GenericResponse = serde_json::from_slice(raw).map_err(|e| {
        ExchangeError::DeserializationError(format!(
            "{} response envelope: {}",
            exchange_name, e
        ))
    })?;

    if envelope.code != SUCCESS_CODE {
        if let Some(known) = ResponseCode::from_code(envelope.code) {
            warn!(
                exchange = exchange_name,
                code = envelope.code,
                method = %envelope.method,
                "{}",
                known.description()
            );
        }
        return Err(api_error(envelope.code, &envelope.message));
    }

    serde_json::from_slice(raw).map_err(|e| {
        ExchangeError::DeserializationError(format!("{} response payload: {}", exchange_name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::cryptocom::types::InstrumentResponse;

    #[test]
    fn test_correlation_by_id_then_nonce() {
        let codec = CryptoComCodec;
        assert_eq!(codec.correlation_id(br#"{"id":17,"code":0}"#), Some(17));
        assert_eq!(codec.correlation_id(br#"{"nonce":"18","code":0}"#), Some(18));
        assert_eq!(
            codec.correlation_id(br#"{"id":-1,"nonce":19,"method":"subscribe"}"#),
            Some(19)
        );
        assert_eq!(codec.correlation_id(br#"{"method":"subscribe"}"#), None);
        assert_eq!(codec.correlation_id(b"garbage"), None);
    }

    #[test]
    fn test_heartbeat_is_never_correlated() {
        let codec = CryptoComCodec;
        let frame = br#"{"id":1587523073344,"method":"public/heartbeat","code":0}"#;
        assert_eq!(codec.correlation_id(frame), None);
        assert_eq!(
            codec.decode_message(frame).unwrap(),
            Some(CryptoComMessage::Heartbeat { id: 1587523073344 })
        );
    }

    #[test]
    fn test_heartbeat_reply_echoes_id() {
        let codec = CryptoComCodec;
        let reply = codec
            .keepalive_reply(br#"{"id":1587523073344,"method":"public/heartbeat","code":0}"#)
            .unwrap();
        let reply: Value = serde_json::from_slice(&reply).unwrap();
        assert_eq!(
            reply,
            serde_json::json!({"id":1587523073344u64,"method":"public/respond-heartbeat"})
        );

        assert!(codec.keepalive_reply(br#"{"id":3,"method":"subscribe"}"#).is_none());
        assert!(codec.keepalive_reply(br#"{"method":"public/heartbeat"}"#).is_none());
    }

    #[test]
    fn test_subscription_frame() {
        let codec = CryptoComCodec;
        let frame = br#"{"method":"subscribe","code":0,"result":{"channel":"ticker",
            "instrument_name":"BTC_USDT","subscription":"ticker.BTC_USDT","data":[{"a":1}]}}"#;
        match codec.decode_message(frame).unwrap() {
            Some(CryptoComMessage::Subscription {
                channel,
                instrument_name,
                data,
            }) => {
                assert_eq!(channel, "ticker");
                assert_eq!(instrument_name.as_deref(), Some("BTC_USDT"));
                assert!(data.is_array());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_error_frame_and_garbage_are_errors() {
        let codec = CryptoComCodec;
        let err = codec
            .decode_message(br#"{"method":"subscribe","code":10004}"#)
            .unwrap_err();
        assert_eq!(err.api_code(), Some(10004));
        assert!(matches!(
            codec.decode_message(b"{not json"),
            Err(ExchangeError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_decode_response_rejects_failure_envelope() {
        let err = decode_response::<InstrumentResponse>(
            "Crypto.com",
            br#"{"code":10002,"message":"unauthorized"}"#,
        )
        .unwrap_err();
        match err {
            ExchangeError::ApiError { code, message } => {
                assert_eq!(code, 10002);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_response_fills_missing_message() {
        let err = decode_response::<InstrumentResponse>("Crypto.com", br#"{"code":10006}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error: 10006 - requests have exceeded rate limits"
        );
    }

    #[test]
    fn test_decode_response_success() {
        let response: InstrumentResponse = decode_response(
            "Crypto.com",
            br#"{"code":0,"method":"public/get-instruments","id":1,"result":{"instruments":[
                {"instrument_name":"CRO_BTC","quote_curency":"BTC","base_currency":"CRO",
                 "price_decimals":8,"quantity_decimals":2,"margin_trading_enabled":false}]}}"#,
        )
        .unwrap();
        assert_eq!(response.result.instruments.len(), 1);
        assert_eq!(response.result.instruments[0].base_currency, "CRO");
    }

    #[test]
    fn test_decode_response_malformed() {
        assert!(matches!(
            decode_response::<InstrumentResponse>("Crypto.com", b"<html>"),
            Err(ExchangeError::DeserializationError(_))
        ));
        assert!(matches!(
            decode_response::<InstrumentResponse>("Crypto.com", br#"{"code":0}"#),
            Err(ExchangeError::DeserializationError(_))
        ));
    }
}
