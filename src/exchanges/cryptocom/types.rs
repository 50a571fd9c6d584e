use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope code meaning the embedded result is valid
pub const SUCCESS_CODE: i64 = 0;

/// Known envelope codes returned by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    SysError,
    Unauthorized,
    IpIllegal,
    BadRequest,
    UserTierInvalid,
    TooManyRequests,
    InvalidNonce,
    MethodNotFound,
    InvalidDateRange,
    DuplicateRecord,
    NegativeBalance,
    SymbolNotFound,
    // the exchange reuses 30004 for both an unsupported side and an
    // unsupported order type
    SideOrOrderTypeNotSupported,
}

impl ResponseCode {
    pub fn from_code(code: i64) -> Option<Self> {
        let known = match code {
            0 => Self::Success,
            10001 => Self::SysError,
            10002 => Self::Unauthorized,
            10003 => Self::IpIllegal,
            10004 => Self::BadRequest,
            10005 => Self::UserTierInvalid,
            10006 => Self::TooManyRequests,
            10007 => Self::InvalidNonce,
            10008 => Self::MethodNotFound,
            10009 => Self::InvalidDateRange,
            20001 => Self::DuplicateRecord,
            20002 => Self::NegativeBalance,
            30003 => Self::SymbolNotFound,
            30004 => Self::SideOrOrderTypeNotSupported,
            _ => return None,
        };
        Some(known)
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::SysError => 10001,
            Self::Unauthorized => 10002,
            Self::IpIllegal => 10003,
            Self::BadRequest => 10004,
            Self::UserTierInvalid => 10005,
            Self::TooManyRequests => 10006,
            Self::InvalidNonce => 10007,
            Self::MethodNotFound => 10008,
            Self::InvalidDateRange => 10009,
            Self::DuplicateRecord => 20001,
            Self::NegativeBalance => 20002,
            Self::SymbolNotFound => 30003,
            Self::SideOrOrderTypeNotSupported => 30004,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SysError => "malformed request or system error",
            Self::Unauthorized => "not authenticated, or key/signature incorrect",
            Self::IpIllegal => "IP address not whitelisted",
            Self::BadRequest => "missing required fields",
            Self::UserTierInvalid => "disallowed based on user tier",
            Self::TooManyRequests => "requests have exceeded rate limits",
            Self::InvalidNonce => "nonce value differs by more than 30 seconds from server",
            Self::MethodNotFound => "invalid method specified",
            Self::InvalidDateRange => "invalid date range",
            Self::DuplicateRecord => "duplicated record",
            Self::NegativeBalance => "insufficient balance",
            Self::SymbolNotFound => "invalid instrument_name specified",
            Self::SideOrOrderTypeNotSupported => "side or order type not supported",
        }
    }
}

/// Fields every response carries next to its endpoint-specific result
#[derive(Debug, Clone, Deserialize)]
pub struct GenericResponse {
    pub code: i64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentResponse {
    pub result: InstrumentResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentResult {
    pub instruments: Vec<Instrument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instrument {
    pub instrument_name: String,
    // the v2 API spells this key "quote_curency"
    #[serde(rename = "quote_curency", alias = "quote_currency")]
    pub quote_currency: String,
    pub base_currency: String,
    pub price_decimals: u32,
    pub quantity_decimals: u32,
    #[serde(default)]
    pub margin_trading_enabled: bool,
}

/// Either a single object or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerResponse {
    pub result: TickerResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerResult {
    #[serde(default)]
    pub instrument_name: Option<String>,
    pub data: OneOrMany<TickerData>,
}

/// 24h ticker, single-letter keys as sent by the exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TickerData {
    /// Instrument name
    #[serde(rename = "i")]
    pub instrument_name: String,
    /// Best bid
    #[serde(rename = "b", default)]
    pub bid: Option<Decimal>,
    /// Best ask
    #[serde(rename = "k", default)]
    pub ask: Option<Decimal>,
    /// Last trade price
    #[serde(rename = "a", default)]
    pub last: Option<Decimal>,
    /// Timestamp in milliseconds
    #[serde(rename = "t")]
    pub timestamp: i64,
    /// 24h volume
    #[serde(rename = "v", default)]
    pub volume: Decimal,
    /// 24h high
    #[serde(rename = "h", default)]
    pub high: Decimal,
    /// 24h low
    #[serde(rename = "l", default)]
    pub low: Decimal,
    /// 24h price change
    #[serde(rename = "c", default)]
    pub change: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookResponse {
    pub result: BookResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookResult {
    pub instrument_name: String,
    #[serde(default)]
    pub depth: u32,
    pub data: Vec<BookData>,
}

/// `[price, quantity, number of orders]`
pub type BookLevel = (Decimal, Decimal, Decimal);

#[derive(Debug, Clone, Deserialize)]
pub struct BookData {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    #[serde(rename = "t")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalHistoryResponse {
    pub result: WithdrawalHistoryResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalHistoryResult {
    pub withdrawal_list: Vec<WithdrawalEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalEntry {
    pub id: String,
    pub currency: String,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    pub address: String,
    #[serde(default)]
    pub client_wid: Option<String>,
    pub status: String,
    pub create_time: i64,
    #[serde(default)]
    pub update_time: Option<i64>,
}

/// Outbound WebSocket command
#[derive(Debug, Clone, Serialize)]
pub struct WsRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_response_code_lookup() {
        assert_eq!(ResponseCode::from_code(0), Some(ResponseCode::Success));
        assert_eq!(
            ResponseCode::from_code(10002),
            Some(ResponseCode::Unauthorized)
        );
        assert_eq!(ResponseCode::from_code(99999), None);
        for code in [10001, 10006, 10009, 20002, 30003, 30004] {
            assert_eq!(ResponseCode::from_code(code).map(ResponseCode::code), Some(code));
        }
    }

    #[test]
    fn test_envelope_fields_default_when_absent() {
        let envelope: GenericResponse =
            serde_json::from_str(r#"{"code":10002,"message":"unauthorized"}"#).unwrap();
        assert_eq!(envelope.code, 10002);
        assert_eq!(envelope.message, "unauthorized");
        assert!(envelope.method.is_empty());
        assert_eq!(envelope.id, 0);
    }

    #[test]
    fn test_instrument_accepts_both_quote_spellings() {
        let misspelled: Instrument = serde_json::from_str(
            r#"{"instrument_name":"BTC_USDT","quote_curency":"USDT","base_currency":"BTC",
                "price_decimals":2,"quantity_decimals":6,"margin_trading_enabled":true}"#,
        )
        .unwrap();
        let spelled: Instrument = serde_json::from_str(
            r#"{"instrument_name":"BTC_USDT","quote_currency":"USDT","base_currency":"BTC",
                "price_decimals":2,"quantity_decimals":6,"margin_trading_enabled":true}"#,
        )
        .unwrap();
        assert_eq!(misspelled, spelled);
        assert_eq!(spelled.quote_currency, "USDT");
    }

    #[test]
    fn test_ticker_data_single_or_list() {
        let single: TickerResult = serde_json::from_str(
            r#"{"instrument_name":"BTC_USDT","data":{"i":"BTC_USDT","b":100.5,"k":101.0,"a":100.75,
                "t":1609459200000,"v":12.5,"h":110,"l":90,"c":-1.25}}"#,
        )
        .unwrap();
        let data = single.data.into_vec();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].bid, Some(Decimal::from_str("100.5").unwrap()));
        assert_eq!(data[0].change, Decimal::from_str("-1.25").unwrap());

        let many: TickerResult =
            serde_json::from_str(r#"{"data":[{"i":"BTC_USDT","t":1},{"i":"ETH_USDT","t":2}]}"#)
                .unwrap();
        assert_eq!(many.data.into_vec().len(), 2);
    }

    #[test]
    fn test_book_levels_accept_strings_and_numbers() {
        let book: BookData = serde_json::from_str(
            r#"{"bids":[["100.5","2","3"],[100.0,1.5,1]],"asks":[[101,1,1]],"t":1609459200000}"#,
        )
        .unwrap();
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0].0, Decimal::from_str("100.5").unwrap());
        assert_eq!(book.asks[0].2, Decimal::ONE);
    }

    #[test]
    fn test_ws_request_skips_empty_fields() {
        let request = WsRequest {
            id: 42,
            method: "public/get-instruments".to_string(),
            params: Map::new(),
            nonce: Some(42),
            api_key: None,
            sig: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["nonce"], 42);
        assert!(json.get("params").is_none());
        assert!(json.get("sig").is_none());
    }
}
