#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use holdfast::domain::error::HoldfastError;
use holdfast::domain::price_table::{Interval, PriceTable};
use holdfast::ports::price_port::PricePort;

pub struct MockPricePort {
    pub first_trades: HashMap<String, NaiveDate>,
    pub series: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            first_trades: HashMap::new(),
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_symbol(
        mut self,
        symbol: &str,
        first_trade: &str,
        series: Vec<(&str, f64)>,
    ) -> Self {
        self.first_trades
            .insert(symbol.to_string(), parse_date(first_trade));
        self.series.insert(
            symbol.to_string(),
            series
                .into_iter()
                .map(|(d, price)| (parse_date(d), price))
                .collect(),
        );
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn first_trade_date(&self, symbol: &str) -> Result<NaiveDate, HoldfastError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(HoldfastError::Source {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.first_trades
            .get(symbol)
            .copied()
            .ok_or_else(|| HoldfastError::NoTradeHistory {
                symbol: symbol.to_string(),
            })
    }

    fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
        _interval: Interval,
    ) -> Result<PriceTable, HoldfastError> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if let Some(reason) = self.errors.get(symbol) {
                return Err(HoldfastError::Source {
                    symbol: symbol.to_string(),
                    reason: reason.clone(),
                });
            }
            let points = self
                .series
                .get(symbol)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|(date, _)| *date >= start && *date <= end)
                .collect();
            series.push((symbol.clone(), points));
        }
        Ok(PriceTable::from_series(series))
    }
}

pub fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The 60/40 fixture used across suites: SPY listed 1993, TLT 2002, two
/// monthly bars from the aligned 2002-08-01 start.
pub fn sixty_forty_port() -> MockPricePort {
    MockPricePort::new()
        .with_symbol(
            "SPY",
            "1993-01-29",
            vec![("2002-08-01", 100.0), ("2002-09-01", 110.0)],
        )
        .with_symbol(
            "TLT",
            "2002-07-26",
            vec![("2002-08-01", 50.0), ("2002-09-01", 55.0)],
        )
}
