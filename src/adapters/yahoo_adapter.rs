//! Yahoo Finance price adapter.
//!
//! Blocking client over the chart API: first-trade dates come from the
//! chart metadata, price series use the adjusted close.

use chrono::{NaiveDate, NaiveTime};
use time::OffsetDateTime;
use yahoo_finance_api::YahooConnector;

use crate::domain::error::HoldfastError;
use crate::domain::price_table::{Interval, PriceTable};
use crate::ports::price_port::PricePort;

pub struct YahooAdapter {
    conn: YahooConnector,
}

impl YahooAdapter {
    pub fn new() -> Self {
        Self {
            conn: YahooConnector::new(),
        }
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<(NaiveDate, f64)>, HoldfastError> {
        let response = self
            .conn
            .get_quote_history_interval(
                symbol,
                utc_midnight(start),
                utc_midnight(end.succ_opt().unwrap_or(end)),
                interval.code(),
            )
            .map_err(|e| source_error(symbol, e))?;
        let quotes = response.quotes().map_err(|e| source_error(symbol, e))?;

        let mut series: Vec<(NaiveDate, f64)> = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let date = timestamp_to_date(quote.timestamp as i64)
                .ok_or_else(|| source_error(symbol, "quote timestamp out of range"))?;
            // Yahoo occasionally stamps a partial bar on the same date as
            // the last full one; keep the most recent value.
            match series.last_mut() {
                Some((last_date, last_price)) if *last_date == date => {
                    *last_price = quote.adjclose;
                }
                _ => series.push((date, quote.adjclose)),
            }
        }
        Ok(series)
    }
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PricePort for YahooAdapter {
    fn first_trade_date(&self, symbol: &str) -> Result<NaiveDate, HoldfastError> {
        let response = self
            .conn
            .get_latest_quotes(symbol, "1d")
            .map_err(|e| source_error(symbol, e))?;
        let metadata = response.metadata().map_err(|e| source_error(symbol, e))?;

        let timestamp = metadata
            .first_trade_date
            .ok_or_else(|| HoldfastError::NoTradeHistory {
                symbol: symbol.to_string(),
            })?;
        timestamp_to_date(i64::from(timestamp)).ok_or_else(|| HoldfastError::NoTradeHistory {
            symbol: symbol.to_string(),
        })
    }

    fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceTable, HoldfastError> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let points = self.fetch_series(symbol, start, end, interval)?;
            series.push((symbol.clone(), points));
        }
        Ok(PriceTable::from_series(series))
    }
}

fn source_error(symbol: &str, err: impl std::fmt::Display) -> HoldfastError {
    HoldfastError::Source {
        symbol: symbol.to_string(),
        reason: err.to_string(),
    }
}

fn utc_midnight(date: NaiveDate) -> OffsetDateTime {
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(seconds).expect("chrono date fits unix range")
}

fn timestamp_to_date(seconds: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}
