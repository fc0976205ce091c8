//! Backtest pipeline: align, fetch, allocate, valuate.

use chrono::NaiveDate;

use crate::domain::align::aligned_start_date;
use crate::domain::allocation::AllocationSpec;
use crate::domain::error::HoldfastError;
use crate::domain::position::PositionSpec;
use crate::domain::price_table::Interval;
use crate::domain::value_table::ValueTable;
use crate::ports::price_port::PricePort;

/// Everything one run produces. Nothing here outlives the run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestOutcome {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interval: Interval,
    pub amount: u64,
    pub positions: PositionSpec,
    pub values: ValueTable,
}

/// Run the buy-and-hold pipeline from the aligned start through today
/// (UTC) at the default monthly interval.
pub fn compute_backtest(
    port: &dyn PricePort,
    amount: u64,
    allocations: &AllocationSpec,
) -> Result<BacktestOutcome, HoldfastError> {
    compute_backtest_as_of(
        port,
        amount,
        allocations,
        chrono::Utc::now().date_naive(),
        Interval::Monthly,
    )
}

/// Pipeline with an explicit window end and interval.
///
/// Steps are strictly sequential, each feeding the next: filter empty
/// symbols, align the start date, fetch prices, size the positions from
/// the first row, value them over the full table.
pub fn compute_backtest_as_of(
    port: &dyn PricePort,
    amount: u64,
    allocations: &AllocationSpec,
    end_date: NaiveDate,
    interval: Interval,
) -> Result<BacktestOutcome, HoldfastError> {
    let allocations = allocations.sanitized();
    if allocations.is_empty() {
        return Err(HoldfastError::NoSymbols);
    }
    let symbols = allocations.symbols();

    let start_date = aligned_start_date(port, &symbols)?;
    let prices = port.fetch_prices(&symbols, start_date, end_date, interval)?;

    let positions = PositionSpec::allocate(&allocations, amount, &prices)?;
    let values = ValueTable::compute(&positions, &prices)?;

    Ok(BacktestOutcome {
        start_date,
        end_date,
        interval,
        amount,
        positions,
        values,
    })
}
