//! CSV file price adapter.
//!
//! Reads one `{SYMBOL}.csv` per symbol from a base directory, with a
//! `date,close` header and adjusted closing prices, date-ascending or not.
//! Useful for offline runs and as a fixture source in tests.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::HoldfastError;
use crate::domain::price_table::{Interval, PriceTable};
use crate::ports::price_port::PricePort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_series(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>, HoldfastError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| HoldfastError::Source {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut series = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| HoldfastError::Source {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| HoldfastError::Source {
                symbol: symbol.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                HoldfastError::Source {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| HoldfastError::Source {
                    symbol: symbol.to_string(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| HoldfastError::Source {
                    symbol: symbol.to_string(),
                    reason: format!("invalid close value: {}", e),
                })?;

            series.push((date, close));
        }

        series.sort_by_key(|(date, _)| *date);
        Ok(series)
    }
}

impl PricePort for CsvAdapter {
    fn first_trade_date(&self, symbol: &str) -> Result<NaiveDate, HoldfastError> {
        let series = self.read_series(symbol)?;
        series
            .first()
            .map(|(date, _)| *date)
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
            let points = self
                .read_series(symbol)?
                .into_iter()
                .filter(|(date, _)| *date >= start && *date <= end)
                .collect();
            series.push((symbol.clone(), points));
        }
        Ok(PriceTable::from_series(series))
    }
}
