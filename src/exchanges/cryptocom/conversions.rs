use crate::core::types::{
    AssetClass, CurrencyPair, Market, OrderBook, OrderBookEntry, Ticker, TypesError,
};
use crate::exchanges::cryptocom::types::{BookData, BookLevel, Instrument, TickerData};
use crate::exchanges::cryptocom::REQUEST_PAIR_FORMAT;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a listed instrument to core market metadata
pub fn convert_instrument(instrument: &Instrument) -> Result<Market, TypesError> {
    let pair = CurrencyPair::new(
        instrument.base_currency.as_str(),
        instrument.quote_currency.as_str(),
    )?;
    Ok(Market {
        pair,
        symbol: instrument.instrument_name.clone(),
        price_precision: instrument.price_decimals,
        quantity_precision: instrument.quantity_decimals,
        margin_trading_enabled: instrument.margin_trading_enabled,
    })
}

/// Parse an instrument name such as `BTC_USDT`
pub fn parse_instrument_name(name: &str) -> Result<CurrencyPair, TypesError> {
    CurrencyPair::from_delimited(name, REQUEST_PAIR_FORMAT.delimiter)
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn convert_ticker(
    exchange: &str,
    pair: &CurrencyPair,
    asset: AssetClass,
    data: TickerData,
) -> Ticker {
    Ticker {
        exchange: exchange.to_string(),
        pair: pair.clone(),
        asset,
        last: data.last.unwrap_or_default(),
        high: data.high,
        low: data.low,
        bid: data.bid.unwrap_or_default(),
        ask: data.ask.unwrap_or_default(),
        volume: data.volume,
        price_change: data.change,
        last_updated: timestamp(data.timestamp),
    }
}

fn convert_level((price, amount, count): BookLevel) -> OrderBookEntry {
    OrderBookEntry {
        price,
        amount,
        order_count: count.to_u32().unwrap_or_default(),
    }
}

pub fn convert_orderbook(
    exchange: &str,
    pair: &CurrencyPair,
    asset: AssetClass,
    data: BookData,
) -> OrderBook {
    OrderBook {
        exchange: exchange.to_string(),
        pair: pair.clone(),
        asset,
        bids: data.bids.into_iter().map(convert_level).collect(),
        asks: data.asks.into_iter().map(convert_level).collect(),
        last_updated: timestamp(data.timestamp),
    }
}

/// Sum of amounts on one side of the book
pub fn side_liquidity(entries: &[OrderBookEntry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn instrument() -> Instrument {
        Instrument {
            instrument_name: "BTC_USDT".to_string(),
            quote_currency: "USDT".to_string(),
            base_currency: "BTC".to_string(),
            price_decimals: 2,
            quantity_decimals: 6,
            margin_trading_enabled: true,
        }
    }

    #[test]
    fn test_convert_instrument() {
        let market = convert_instrument(&instrument()).unwrap();
        assert_eq!(market.pair, CurrencyPair::new("BTC", "USDT").unwrap());
        assert_eq!(market.symbol, "BTC_USDT");
        assert_eq!(market.price_precision, 2);
        assert!(market.margin_trading_enabled);
    }

    #[test]
    fn test_parse_instrument_name() {
        let pair = parse_instrument_name("CRO_BTC").unwrap();
        assert_eq!(pair.base, "CRO");
        assert_eq!(pair.format(&REQUEST_PAIR_FORMAT), "CRO_BTC");
        assert!(parse_instrument_name("CROBTC").is_err());
    }

    #[test]
    fn test_convert_orderbook_levels() {
        let pair = CurrencyPair::new("BTC", "USDT").unwrap();
        let data = BookData {
            bids: vec![(
                Decimal::from_str("100").unwrap(),
                Decimal::from_str("1.5").unwrap(),
                Decimal::from(3),
            )],
            asks: vec![(
                Decimal::from_str("101").unwrap(),
                Decimal::from_str("2").unwrap(),
                Decimal::ONE,
            )],
            timestamp: 1_609_459_200_000,
        };
        let book = convert_orderbook("Crypto.com", &pair, AssetClass::Spot, data);
        assert_eq!(book.bids[0].order_count, 3);
        assert_eq!(side_liquidity(&book.asks), Decimal::from(2));
        assert_eq!(book.last_updated.timestamp_millis(), 1_609_459_200_000);
        assert!(book.verify().is_ok());
    }
}
