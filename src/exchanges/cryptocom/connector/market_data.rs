use crate::core::cache::MarketCache;
use crate::core::errors::ExchangeError;
use crate::core::kernel::HttpRequester;
use crate::core::types::{
    AssetClass, CurrencyPair, Kline, KlineInterval, Market, OrderBook, Ticker, Trade,
};
use crate::exchanges::cryptocom::{
    conversions, rest::CryptoComRest, DEFAULT_BOOK_DEPTH, REQUEST_PAIR_FORMAT,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::{info, instrument, warn};

/// Crypto.com market data implementation
#[derive(Debug)]
pub struct MarketData<H: HttpRequester> {
    rest: Arc<CryptoComRest<H>>,
    cache: Arc<MarketCache>,
    enabled_pairs: RwLock<Vec<CurrencyPair>>,
    verify_orderbook: bool,
    exchange_name: String,
}

impl<H: HttpRequester> MarketData<H> {
    pub fn new(
        rest: Arc<CryptoComRest<H>>,
        cache: Arc<MarketCache>,
        verify_orderbook: bool,
        exchange_name: String,
    ) -> Self {
        Self {
            rest,
            cache,
            enabled_pairs: RwLock::new(Vec::new()),
            verify_orderbook,
            exchange_name,
        }
    }

    pub fn enabled_pairs(&self) -> Vec<CurrencyPair> {
        self.enabled_pairs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Listed instruments as core markets; unparseable entries are skipped
    pub async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let instruments = self.rest.get_instruments().await?;

        let mut markets = Vec::with_capacity(instruments.len());
        for instrument in &instruments {
            match conversions::convert_instrument(instrument) {
                Ok(market) => markets.push(market),
                Err(e) => warn!(
                    instrument = %instrument.instrument_name,
                    "Failed to convert instrument: {}", e
                ),
            }
        }
        Ok(markets)
    }

    pub async fn fetch_tradable_pairs(
        &self,
        asset: AssetClass,
    ) -> Result<Vec<String>, ExchangeError> {
        let instruments = self.rest.get_instruments().await?;
        Ok(instruments
            .into_iter()
            .filter(|i| asset == AssetClass::Spot || i.margin_trading_enabled)
            .map(|i| i.instrument_name)
            .collect())
    }

    #[instrument(skip(self), fields(exchange = %self.exchange_name))]
    pub async fn update_tradable_pairs(&self, force: bool) -> Result<(), ExchangeError> {
        let names = self.fetch_tradable_pairs(AssetClass::Spot).await?;
        let pairs = names
            .iter()
            .map(|name| conversions::parse_instrument_name(name))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ExchangeError::InvalidParameters(e.to_string()))?;

        let mut enabled = self
            .enabled_pairs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !force && *enabled == pairs {
            return Ok(());
        }
        info!(count = pairs.len(), "updated tradable pairs");
        *enabled = pairs;
        Ok(())
    }

    pub async fn update_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError> {
        let data = self
            .rest
            .get_ticker(&pair.format(&REQUEST_PAIR_FORMAT))
            .await?;
        let ticker = conversions::convert_ticker(&self.exchange_name, pair, asset, data);
        self.cache.insert_ticker(ticker.clone());
        Ok(ticker)
    }

    pub async fn fetch_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<Ticker, ExchangeError> {
        match self.cache.ticker(&self.exchange_name, pair, asset) {
            Some(ticker) => Ok(ticker),
            None => self.update_ticker(pair, asset).await,
        }
    }

    pub async fn update_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError> {
        let data = self
            .rest
            .get_book(&pair.format(&REQUEST_PAIR_FORMAT), DEFAULT_BOOK_DEPTH)
            .await?;
        let book = conversions::convert_orderbook(&self.exchange_name, pair, asset, data);
        if self.verify_orderbook {
            book.verify()
                .map_err(|e| ExchangeError::InvalidOrderBook(e.to_string()))?;
        }
        self.cache.insert_orderbook(book.clone());
        Ok(book)
    }

    pub async fn fetch_orderbook(
        &self,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Result<OrderBook, ExchangeError> {
        match self.cache.orderbook(&self.exchange_name, pair, asset) {
            Some(book) => Ok(book),
            None => self.update_orderbook(pair, asset).await,
        }
    }

    pub async fn get_recent_trades(
        &self,
        _pair: &CurrencyPair,
        _asset: AssetClass,
    ) -> Result<Vec<Trade>, ExchangeError> {
        Err(ExchangeError::NotImplemented("get_recent_trades".to_string()))
    }

    pub async fn get_historic_trades(
        &self,
        _pair: &CurrencyPair,
        _asset: AssetClass,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        Err(ExchangeError::NotImplemented(
            "get_historic_trades".to_string(),
        ))
    }

    pub async fn get_historic_candles(
        &self,
        _pair: &CurrencyPair,
        _asset: AssetClass,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _interval: KlineInterval,
    ) -> Result<Vec<Kline>, ExchangeError> {
        Err(ExchangeError::NotImplemented(
            "get_historic_candles".to_string(),
        ))
    }
}
