use crate::core::{
    errors::ExchangeError,
    types::{
        AccountHoldings, AssetClass, CancelAllResponse, CurrencyPair, FeeQuery, FundHistory,
        Kline, KlineInterval, OrderBook, OrderCancel, OrderDetail, OrderModify, OrderRequest,
        OrderResponse, OrdersQuery, Ticker, Trade, WithdrawRequest, WithdrawResponse,
        WithdrawalRecord,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[async_trait]
pub trait MarketDataSource {
    /// Instrument names currently tradable on the exchange
    async fn fetch_tradable_pairs(&self, asset: AssetClass) -> Result<Vec<String>, ExchangeError>;

    /// Refresh the set of enabled pairs
    async fn update_tradable_pairs(&self, force: bool) -> Result<(), ExchangeError>;

    /// Query the exchange for a fresh ticker
    async fn update_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError>;

    /// Cached ticker, falling back to `update_ticker`
    async fn fetch_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError>;

    /// Query the exchange for a fresh orderbook
    async fn update_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError>;

    /// Cached orderbook, falling back to `update_orderbook`
    async fn fetch_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError>;

    async fn get_recent_trades(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Vec<Trade>, ExchangeError>;

    async fn get_historic_trades(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Trade>, ExchangeError>;

    async fn get_historic_candles(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: KlineInterval,
    ) -> Result<Vec<Kline>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderResponse, ExchangeError>;

    async fn modify_order(&self, modify: OrderModify) -> Result<String, ExchangeError>;

    async fn cancel_order(&self, cancel: OrderCancel) -> Result<(), ExchangeError>;

    async fn cancel_batch_orders(
        &self,
        cancels: Vec<OrderCancel>,
    ) -> Result<CancelAllResponse, ExchangeError>;

    async fn cancel_all_orders(
        &self,
        cancel: OrderCancel,
    ) -> Result<CancelAllResponse, ExchangeError>;

    async fn get_order_info(
        &self,
        order_id: &str,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderDetail, ExchangeError>;

    async fn get_active_orders(&self, query: OrdersQuery)
        -> Result<Vec<OrderDetail>, ExchangeError>;

    async fn get_order_history(&self, query: OrdersQuery)
        -> Result<Vec<OrderDetail>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn update_account_info(&self, asset: AssetClass)
        -> Result<AccountHoldings, ExchangeError>;

    async fn fetch_account_info(&self, asset: AssetClass)
        -> Result<AccountHoldings, ExchangeError>;

    async fn get_funding_history(&self) -> Result<Vec<FundHistory>, ExchangeError>;

    async fn get_withdrawals_history(
        &self,
        currency: &str,
    ) -> Result<Vec<WithdrawalRecord>, ExchangeError>;

    async fn get_deposit_address(
        &self,
        currency: &str,
        account_id: &str,
    ) -> Result<String, ExchangeError>;

    async fn withdraw_crypto(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawResponse, ExchangeError>;

    async fn withdraw_fiat(&self, request: WithdrawRequest)
        -> Result<WithdrawResponse, ExchangeError>;

    async fn withdraw_fiat_international(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawResponse, ExchangeError>;

    async fn get_fee_by_type(&self, query: FeeQuery) -> Result<Decimal, ExchangeError>;

    /// Check the configured credentials against the exchange
    async fn validate_credentials(&self, asset: AssetClass) -> Result<(), ExchangeError>;
}

/// The full exchange-adapter interface
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {
    fn name(&self) -> &str;

    /// Start-up work: pair refresh when auto updates are on
    async fn run(&self) -> Result<(), ExchangeError>;
}
