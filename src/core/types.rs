use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Typed errors for the types subsystem
#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] rust_decimal::Error),
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

/// Asset class a pair trades under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Spot,
    Margin,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => f.write_str("spot"),
            Self::Margin => f.write_str("margin"),
        }
    }
}

/// How a pair is rendered when sent to an exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFormat {
    pub uppercase: bool,
    pub delimiter: &'static str,
}

impl PairFormat {
    pub const fn new(uppercase: bool, delimiter: &'static str) -> Self {
        Self {
            uppercase,
            delimiter,
        }
    }
}

/// Currency pair with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Result<Self, TypesError> {
        let base = base.into();
        let quote = quote.into();

        if base.is_empty() || quote.is_empty() {
            return Err(TypesError::InvalidSymbol(
                "Base and quote assets cannot be empty".to_string(),
            ));
        }

        Ok(Self { base, quote })
    }

    /// Parse an exchange instrument name such as `BTC_USDT`
    pub fn from_delimited(symbol: &str, delimiter: &str) -> Result<Self, TypesError> {
        symbol
            .split_once(delimiter)
            .ok_or_else(|| TypesError::InvalidSymbol(format!("{} has no '{}'", symbol, delimiter)))
            .and_then(|(base, quote)| Self::new(base, quote))
    }

    /// Render the pair in an exchange request format
    pub fn format(&self, format: &PairFormat) -> String {
        let raw = format!("{}{}{}", self.base, format.delimiter, self.quote);
        if format.uppercase {
            raw.to_uppercase()
        } else {
            raw.to_lowercase()
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Tradable instrument metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub pair: CurrencyPair,
    pub symbol: String,
    pub price_precision: u32,
    pub quantity_precision: u32,
    pub margin_trading_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub exchange: String,
    pub pair: CurrencyPair,
    pub asset: AssetClass,
    pub last: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub volume: Decimal,
    pub price_change: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub amount: Decimal,
    pub order_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub exchange: String,
    pub pair: CurrencyPair,
    pub asset: AssetClass,
    pub bids: Vec<OrderBookEntry>,
    pub asks: Vec<OrderBookEntry>,
    pub last_updated: DateTime<Utc>,
}

impl OrderBook {
    /// Check price ordering: bids descending, asks ascending, book not crossed
    pub fn verify(&self) -> Result<(), TypesError> {
        if self.bids.windows(2).any(|w| w[0].price < w[1].price) {
            return Err(TypesError::InvalidOrder(format!(
                "{} {} bids out of order",
                self.exchange, self.pair
            )));
        }
        if self.asks.windows(2).any(|w| w[0].price > w[1].price) {
            return Err(TypesError::InvalidOrder(format!(
                "{} {} asks out of order",
                self.exchange, self.pair
            )));
        }
        if let (Some(bid), Some(ask)) = (self.bids.first(), self.asks.first()) {
            if bid.price >= ask.price {
                return Err(TypesError::InvalidOrder(format!(
                    "{} {} crossed book: bid {} >= ask {}",
                    self.exchange, self.pair, bid.price, ask.price
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    StopLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC, // Good Till Canceled
    IOC, // Immediate or Cancel
    FOK, // Fill or Kill
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub pair: CurrencyPair,
    pub asset: AssetClass,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.quantity <= Decimal::ZERO {
            return Err(TypesError::InvalidOrder(
                "quantity must be positive".to_string(),
            ));
        }
        match (self.order_type, self.price) {
            (OrderType::Limit | OrderType::StopLimit, None) => Err(TypesError::InvalidOrder(
                "limit orders require a price".to_string(),
            )),
            (_, Some(price)) if price <= Decimal::ZERO => Err(TypesError::InvalidOrder(
                "price must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub client_order_id: Option<String>,
    pub pair: CurrencyPair,
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderModify {
    pub order_id: String,
    pub pair: CurrencyPair,
    pub price: Option<Decimal>,
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancel {
    pub order_id: Option<String>,
    pub pair: CurrencyPair,
    pub asset: AssetClass,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAllResponse {
    pub cancelled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub pair: CurrencyPair,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub executed_quantity: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersQuery {
    pub pairs: Vec<CurrencyPair>,
    pub asset: AssetClass,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHoldings {
    pub exchange: String,
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundHistory {
    pub currency: String,
    pub amount: Decimal,
    pub transfer_type: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub currency: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub address: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub currency: String,
    pub amount: Decimal,
    pub address: Option<String>,
    pub bank_account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeType {
    Trade,
    CryptoWithdrawal,
    FiatWithdrawal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeQuery {
    pub fee_type: FeeType,
    pub pair: Option<CurrencyPair>,
    pub amount: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub pair: CurrencyPair,
    pub id: String,
    pub price: Decimal,
    pub amount: Decimal,
    pub side: OrderSide,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    pub pair: CurrencyPair,
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes1,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours4,
    Hours6,
    Hours12,
    Days1,
    Weeks1,
    Months1,
}
