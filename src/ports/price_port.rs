//! Price source port trait.

use crate::domain::error::HoldfastError;
use crate::domain::price_table::{Interval, PriceTable};
use chrono::NaiveDate;

pub trait PricePort {
    /// Earliest date the symbol has recorded trading data.
    fn first_trade_date(&self, symbol: &str) -> Result<NaiveDate, HoldfastError>;

    /// Adjusted closing prices for `symbols` over `[start, end]` at the
    /// given interval, one column per requested symbol.
    fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceTable, HoldfastError>;
}
