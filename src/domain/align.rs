//! Date aligner: common gap-free start for a set of symbols.
//!
//! Aligning on the earliest-listed symbol would leave leading gaps for
//! symbols that began trading later, so the window starts at the first
//! day of the month after the most recently listed symbol's first trade.

use chrono::{Datelike, NaiveDate};

use crate::domain::error::HoldfastError;
use crate::ports::price_port::PricePort;

/// First day of the calendar month after `date`.
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date")
}

/// Inclusive start of the fetch window for `symbols`: the next-month start
/// of the latest first-trade date among them.
///
/// A symbol without a resolvable first-trade date aborts the run.
pub fn aligned_start_date(
    port: &dyn PricePort,
    symbols: &[String],
) -> Result<NaiveDate, HoldfastError> {
    let mut latest: Option<NaiveDate> = None;
    for symbol in symbols {
        let first_trade = port.first_trade_date(symbol)?;
        latest = Some(match latest {
            Some(current) => current.max(first_trade),
            None => first_trade,
        });
    }

    match latest {
        Some(date) => Ok(next_month_start(date)),
        None => Err(HoldfastError::NoSymbols),
    }
}
