//! Allocation engine: whole-unit purchases from ratios and a price snapshot.

use crate::domain::allocation::AllocationSpec;
use crate::domain::error::HoldfastError;
use crate::domain::price_table::PriceTable;

/// A symbol's target ratio together with the unit count bought at the
/// start of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub ratio: f64,
    pub units: u64,
}

/// The purchased portfolio for one run. Built once from the first price
/// row, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSpec {
    positions: Vec<Position>,
}

impl PositionSpec {
    /// Convert an allocation into whole-unit purchases against the first
    /// row of `prices`: `units = floor(amount * ratio / 100 / price)`.
    ///
    /// Fractional shares are not modeled, so units may be zero. A symbol
    /// with no column or no price in the first row is fatal.
    pub fn allocate(
        spec: &AllocationSpec,
        amount: u64,
        prices: &PriceTable,
    ) -> Result<PositionSpec, HoldfastError> {
        let first_row = prices.first_row().ok_or(HoldfastError::EmptyPriceTable)?;

        let mut positions = Vec::with_capacity(spec.len());
        for allocation in spec.entries() {
            let column = prices.column(&allocation.symbol)?;
            let price =
                first_row
                    .get(column)
                    .ok_or_else(|| HoldfastError::MissingPriceData {
                        symbol: allocation.symbol.clone(),
                    })?;

            let units = (amount as f64 * allocation.ratio / 100.0 / price).floor() as u64;
            positions.push(Position {
                symbol: allocation.symbol.clone(),
                ratio: allocation.ratio,
                units,
            });
        }

        Ok(PositionSpec { positions })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn units(&self, symbol: &str) -> Option<u64> {
        self.positions
            .iter()
            .find(|p| p.symbol == symbol)
            .map(|p| p.units)
    }
}
