use cryptocom_connector::core::config::ExchangeConfig;
use cryptocom_connector::core::traits::{ExchangeConnector, MarketDataSource, OrderPlacer};
use cryptocom_connector::core::types::{
    AssetClass, CurrencyPair, OrderRequest, OrderSide, OrderType, TimeInForce,
};
use cryptocom_connector::exchanges::cryptocom::conversions::side_liquidity;
use cryptocom_connector::CryptoComBuilder;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Credentials are optional; public market data works without them
    let config = ExchangeConfig::from_env("CRYPTOCOM")
        .unwrap_or_else(|_| ExchangeConfig::read_only())
        .auto_pair_updates(true);

    let connector = CryptoComBuilder::new(config).build()?;
    connector.run().await?;
    info!(
        "{} has {} tradable pairs",
        connector.name(),
        connector.market.enabled_pairs().len()
    );

    let markets = connector.market.get_markets().await?;
    for market in markets.iter().take(5) {
        info!(
            "Market: {} ({} -> {}), price decimals {}",
            market.symbol, market.pair.base, market.pair.quote, market.price_precision
        );
    }

    let pair = CurrencyPair::new("BTC", "USDT")?;
    match connector.fetch_ticker(&pair, AssetClass::Spot).await {
        Ok(ticker) => info!(
            "{} last {} bid {} ask {}",
            pair, ticker.last, ticker.bid, ticker.ask
        ),
        Err(e) => warn!("ticker failed: {}", e),
    }
    match connector.fetch_orderbook(&pair, AssetClass::Spot).await {
        Ok(book) => info!(
            "{} book: {} bids ({}), {} asks ({})",
            pair,
            book.bids.len(),
            side_liquidity(&book.bids),
            book.asks.len(),
            side_liquidity(&book.asks)
        ),
        Err(e) => warn!("orderbook failed: {}", e),
    }

    let order = OrderRequest {
        pair,
        asset: AssetClass::Spot,
        side: OrderSide::Buy,
        order_type: OrderType::Limit,
        quantity: Decimal::new(1, 3),
        price: Some(Decimal::new(30_000, 0)),
        time_in_force: Some(TimeInForce::GTC),
        client_order_id: None,
    };
    if let Err(e) = connector.submit_order(order).await {
        info!("submit_order: {}", e);
    }

    Ok(())
}
