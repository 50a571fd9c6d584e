use crate::core::types::{AssetClass, CurrencyPair, OrderBook, Ticker};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

/// Default number of entries retained per cache
pub const DEFAULT_MARKET_CACHE_CAPACITY: usize = 256;

type MarketKey = (String, CurrencyPair, AssetClass);

/// Bounded store of the latest tickers and orderbooks.
///
/// One instance is owned by whoever builds the connectors and handed to them
/// by `Arc`. Both maps evict the least recently used entry once full.
pub struct MarketCache {
    tickers: Mutex<LruCache<MarketKey, Ticker>>,
    orderbooks: Mutex<LruCache<MarketKey, OrderBook>>,
}

impl std::fmt::Debug for MarketCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketCache")
            .field("tickers", &lock(&self.tickers).len())
            .field("orderbooks", &lock(&self.orderbooks).len())
            .finish()
    }
}

impl Default for MarketCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_MARKET_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

// A poisoned lock only means another thread panicked mid-insert; the LRU is
// still structurally sound.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MarketCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            tickers: Mutex::new(LruCache::new(capacity)),
            orderbooks: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn insert_ticker(&self, ticker: Ticker) {
        let key = (ticker.exchange.clone(), ticker.pair.clone(), ticker.asset);
        lock(&self.tickers).put(key, ticker);
    }

    pub fn ticker(&self, exchange: &str, pair: &CurrencyPair, asset: AssetClass) -> Option<Ticker> {
        lock(&self.tickers)
            .get(&(exchange.to_string(), pair.clone(), asset))
            .cloned()
    }

    pub fn insert_orderbook(&self, book: OrderBook) {
        let key = (book.exchange.clone(), book.pair.clone(), book.asset);
        lock(&self.orderbooks).put(key, book);
    }

    pub fn orderbook(
        &self,
        exchange: &str,
        pair: &CurrencyPair,
        asset: AssetClass,
    ) -> Option<OrderBook> {
        lock(&self.orderbooks)
            .get(&(exchange.to_string(), pair.clone(), asset))
            .cloned()
    }

    pub fn ticker_count(&self) -> usize {
        lock(&self.tickers).len()
    }

    pub fn orderbook_count(&self) -> usize {
        lock(&self.orderbooks).len()
    }
}
