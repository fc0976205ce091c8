//! Typed price table: date-ordered rows, symbol-keyed columns.
//!
//! A missing column is a hard lookup error; a missing cell is `None` and
//! means the source had no price for that symbol in that period.

use chrono::NaiveDate;

use crate::domain::error::HoldfastError;

/// Sampling interval for fetched price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Interval {
    /// Yahoo-style range code.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }

    pub fn parse(value: &str) -> Option<Interval> {
        match value.trim().to_lowercase().as_str() {
            "daily" | "1d" => Some(Interval::Daily),
            "weekly" | "1wk" => Some(Interval::Weekly),
            "monthly" | "1mo" => Some(Interval::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        };
        write!(f, "{name}")
    }
}

/// One period: a date and one optional price per table column.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    prices: Vec<Option<f64>>,
}

impl PriceRow {
    pub fn new(date: NaiveDate, prices: Vec<Option<f64>>) -> Self {
        Self { date, prices }
    }

    pub fn get(&self, column: usize) -> Option<f64> {
        self.prices.get(column).copied().flatten()
    }
}

/// Adjusted closing prices for a set of symbols over time, rows sorted by
/// date ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    symbols: Vec<String>,
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(symbols: Vec<String>, mut rows: Vec<PriceRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        Self { symbols, rows }
    }

    /// Build a table from one `(date, price)` series per symbol. Rows are
    /// the union of all dates; symbols without a price on a date get `None`.
    pub fn from_series(series: Vec<(String, Vec<(NaiveDate, f64)>)>) -> Self {
        let symbols: Vec<String> = series.iter().map(|(s, _)| s.clone()).collect();

        let mut dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|(d, _)| *d))
            .collect();
        dates.sort();
        dates.dedup();

        let rows = dates
            .into_iter()
            .map(|date| {
                let prices = series
                    .iter()
                    .map(|(_, points)| {
                        points
                            .iter()
                            .find(|(d, _)| *d == date)
                            .map(|(_, price)| *price)
                    })
                    .collect();
                PriceRow::new(date, prices)
            })
            .collect();

        Self { symbols, rows }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&PriceRow> {
        self.rows.first()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Column index for a symbol; a symbol without a column is fatal.
    pub fn column(&self, symbol: &str) -> Result<usize, HoldfastError> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| HoldfastError::MissingPriceData {
                symbol: symbol.to_string(),
            })
    }

    /// Price for a symbol in a given row. `Ok(None)` is a data gap.
    pub fn price(&self, symbol: &str, row: usize) -> Result<Option<f64>, HoldfastError> {
        let column = self.column(symbol)?;
        Ok(self.rows.get(row).and_then(|r| r.get(column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_codes() {
        assert_eq!(Interval::Daily.code(), "1d");
        assert_eq!(Interval::Weekly.code(), "1wk");
        assert_eq!(Interval::Monthly.code(), "1mo");
    }

    #[test]
    fn interval_parse() {
        assert_eq!(Interval::parse("monthly"), Some(Interval::Monthly));
        assert_eq!(Interval::parse("1wk"), Some(Interval::Weekly));
        assert_eq!(Interval::parse(" Daily "), Some(Interval::Daily));
        assert_eq!(Interval::parse("hourly"), None);
    }

    #[test]
    fn from_series_unions_dates_in_order() {
        let table = PriceTable::from_series(vec![
            (
                "SPY".into(),
                vec![(date(2024, 2, 1), 101.0), (date(2024, 1, 1), 100.0)],
            ),
            ("TLT".into(), vec![(date(2024, 2, 1), 50.0)]),
        ]);

        assert_eq!(table.symbols(), ["SPY", "TLT"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].date, date(2024, 1, 1));
        assert_eq!(table.price("SPY", 0).unwrap(), Some(100.0));
        // TLT has no January bar: a gap, not an error
        assert_eq!(table.price("TLT", 0).unwrap(), None);
        assert_eq!(table.price("TLT", 1).unwrap(), Some(50.0));
    }

    #[test]
    fn missing_column_is_fatal() {
        let table = PriceTable::from_series(vec![(
            "SPY".into(),
            vec![(date(2024, 1, 1), 100.0)],
        )]);
        let err = table.price("TLT", 0).unwrap_err();
        assert!(matches!(
            err,
            HoldfastError::MissingPriceData { symbol } if symbol == "TLT"
        ));
    }

    #[test]
    fn rows_sorted_on_construction() {
        let rows = vec![
            PriceRow::new(date(2024, 3, 1), vec![Some(3.0)]),
            PriceRow::new(date(2024, 1, 1), vec![Some(1.0)]),
            PriceRow::new(date(2024, 2, 1), vec![Some(2.0)]),
        ];
        let table = PriceTable::new(vec!["SPY".into()], rows);
        let dates: Vec<NaiveDate> = table.rows().iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn first_row_of_empty_table() {
        let table = PriceTable::new(vec!["SPY".into()], vec![]);
        assert!(table.first_row().is_none());
        assert!(table.is_empty());
    }
}
