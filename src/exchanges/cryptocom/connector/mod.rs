use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpRequester, WsDialer};
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{
    AccountHoldings, AssetClass, CancelAllResponse, CurrencyPair, FeeQuery, FundHistory, Kline,
    KlineInterval, OrderBook, OrderCancel, OrderDetail, OrderModify, OrderRequest, OrderResponse,
    OrdersQuery, Ticker, Trade, WithdrawRequest, WithdrawResponse, WithdrawalRecord,
};
use crate::exchanges::cryptocom::rest::CryptoComRest;
use crate::exchanges::cryptocom::types::Instrument;
use crate::exchanges::cryptocom::websocket::CryptoComWebSocket;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Crypto.com connector composed of a REST client, a WebSocket client and
/// the market/trading/account sub-components that delegate to them
pub struct CryptoComConnector<H: HttpRequester, D: WsDialer> {
    name: String,
    auto_pair_updates: bool,
    verbose: bool,
    rest: Arc<CryptoComRest<H>>,
    ws: CryptoComWebSocket<D>,
    pub market: MarketData<H>,
    pub trading: Trading,
    pub account: Account,
}

impl<H: HttpRequester, D: WsDialer> CryptoComConnector<H, D> {
    pub fn new(
        name: String,
        rest: Arc<CryptoComRest<H>>,
        ws: CryptoComWebSocket<D>,
        market: MarketData<H>,
        auto_pair_updates: bool,
        verbose: bool,
    ) -> Self {
        Self {
            name,
            auto_pair_updates,
            verbose,
            rest,
            ws,
            market,
            trading: Trading::new(),
            account: Account::new(),
        }
    }

    pub fn rest(&self) -> &CryptoComRest<H> {
        &self.rest
    }

    pub fn websocket(&self) -> &CryptoComWebSocket<D> {
        &self.ws
    }

    /// Open the streaming connection
    pub async fn connect_websocket(&self) -> Result<(), ExchangeError> {
        self.ws.connect().await
    }

    /// Instrument snapshot over the streaming connection
    pub async fn get_ws_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        self.ws.get_ws_instruments().await
    }

    pub async fn shutdown(&self) -> Result<(), ExchangeError> {
        self.ws.shutdown().await
    }
}

#[async_trait]
impl<H: HttpRequester, D: WsDialer> MarketDataSource for CryptoComConnector<H, D> {
    async fn fetch_tradable_pairs(&self, asset: AssetClass) -> Result<Vec<String>, ExchangeError> {
        self.market.fetch_tradable_pairs(asset).await
    }

    async fn update_tradable_pairs(&self, force: bool) -> Result<(), ExchangeError> {
        self.market.update_tradable_pairs(force).await
    }

    async fn update_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError> {
        self.market.update_ticker(pair, asset).await
    }

    async fn fetch_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError> {
        self.market.fetch_ticker(pair, asset).await
    }

    async fn update_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError> {
        self.market.update_orderbook(pair, asset).await
    }

    async fn fetch_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError> {
        self.market.fetch_orderbook(pair, asset).await
    }

    async fn get_recent_trades(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_recent_trades(pair, asset).await
    }

    async fn get_historic_trades(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_historic_trades(pair, asset, start, end).await
    }

    async fn get_historic_candles(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: KlineInterval,
    ) -> Result<Vec<Kline>, ExchangeError> {
        self.market
            .get_historic_candles(pair, asset, start, end, interval)
            .await
    }
}

#[async_trait]
impl<H: HttpRequester, D: WsDialer> OrderPlacer for CryptoComConnector<H, D> {
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderResponse, ExchangeError> {
        self.trading.submit_order(order).await
    }

    async fn modify_order(&self, modify: OrderModify) -> Result<String, ExchangeError> {
        self.trading.modify_order(modify).await
    }

    async fn cancel_order(&self, cancel: OrderCancel) -> Result<(), ExchangeError> {
        self.trading.cancel_order(cancel).await
    }

    async fn cancel_batch_orders(
        &self,
        cancels: Vec<OrderCancel>,
    ) -> Result<CancelAllResponse, ExchangeError> {
        self.trading.cancel_batch_orders(cancels).await
    }

    async fn cancel_all_orders(
        &self,
        cancel: OrderCancel,
    ) -> Result<CancelAllResponse, ExchangeError> {
        self.trading.cancel_all_orders(cancel).await
    }

    async fn get_order_info(
        &self,
        order_id: &str,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderDetail, ExchangeError> {
        self.trading.get_order_info(order_id, pair, asset).await
    }

    async fn get_active_orders(
        &self,
        query: OrdersQuery,
    ) -> Result<Vec<OrderDetail>, ExchangeError> {
        self.trading.get_active_orders(query).await
    }

    async fn get_order_history(
        &self,
        query: OrdersQuery,
    ) -> Result<Vec<OrderDetail>, ExchangeError> {
        self.trading.get_order_history(query).await
    }
}

#[async_trait]
impl<H: HttpRequester, D: WsDialer> AccountInfo for CryptoComConnector<H, D> {
    async fn update_account_info(
        &self,
        asset: AssetClass,
    ) -> Result<AccountHoldings, ExchangeError> {
        self.account.update_account_info(asset).await
    }

    async fn fetch_account_info(
        &self,
        asset: AssetClass,
    ) -> Result<AccountHoldings, ExchangeError> {
        self.account.fetch_account_info(asset).await
    }

    async fn get_funding_history(&self) -> Result<Vec<FundHistory>, ExchangeError> {
        self.account.get_funding_history().await
    }

    async fn get_withdrawals_history(
        &self,
        currency: &str,
    ) -> Result<Vec<WithdrawalRecord>, ExchangeError> {
        self.account.get_withdrawals_history(currency).await
    }

    async fn get_deposit_address(
        &self,
        currency: &str,
        account_id: &str,
    ) -> Result<String, ExchangeError> {
        self.account.get_deposit_address(currency, account_id).await
    }

    async fn withdraw_crypto(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawResponse, ExchangeError> {
        self.account.withdraw_crypto(request).await
    }

    async fn withdraw_fiat(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawResponse, ExchangeError> {
        self.account.withdraw_fiat(request).await
    }

    async fn withdraw_fiat_international(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawResponse, ExchangeError> {
        self.account.withdraw_fiat_international(request).await
    }

    async fn get_fee_by_type(&self, query: FeeQuery) -> Result<Decimal, ExchangeError> {
        self.account.get_fee_by_type(query).await
    }

    async fn validate_credentials(&self, asset: AssetClass) -> Result<(), ExchangeError> {
        self.account.validate_credentials(asset).await
    }
}

#[async_trait]
impl<H: HttpRequester, D: WsDialer> ExchangeConnector for CryptoComConnector<H, D> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(exchange = %self.name))]
    async fn run(&self) -> Result<(), ExchangeError> {
        if self.verbose {
            debug!(
                websocket = self.ws.is_enabled(),
                pairs = ?self.market.enabled_pairs(),
                "starting"
            );
        }

        if !self.auto_pair_updates {
            return Ok(());
        }

        if let Err(e) = self.market.update_tradable_pairs(false).await {
            error!("failed to update tradable pairs: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
