//! Valuation engine: units × price over the full window, plus a Total.

use chrono::NaiveDate;

use crate::domain::error::HoldfastError;
use crate::domain::position::PositionSpec;
use crate::domain::price_table::PriceTable;

/// One valued period. `total` is `None` whenever any symbol's value is
/// missing for the period; gaps propagate, they are never interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub date: NaiveDate,
    values: Vec<Option<f64>>,
    pub total: Option<f64>,
}

impl ValueRow {
    pub fn get(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Portfolio value over time: one column per held symbol, rows in the
/// price table's chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    symbols: Vec<String>,
    rows: Vec<ValueRow>,
}

impl ValueTable {
    /// Multiply each position's unit count through its price series and
    /// sum row-wise into `total`.
    pub fn compute(
        positions: &PositionSpec,
        prices: &PriceTable,
    ) -> Result<ValueTable, HoldfastError> {
        let columns: Vec<usize> = positions
            .positions()
            .iter()
            .map(|p| prices.column(&p.symbol))
            .collect::<Result<_, _>>()?;

        let rows = prices
            .rows()
            .iter()
            .map(|row| {
                let values: Vec<Option<f64>> = positions
                    .positions()
                    .iter()
                    .zip(&columns)
                    .map(|(position, &column)| {
                        row.get(column).map(|price| position.units as f64 * price)
                    })
                    .collect();

                let total = values
                    .iter()
                    .copied()
                    .try_fold(0.0, |acc, v| v.map(|v| acc + v));

                ValueRow {
                    date: row.date,
                    values,
                    total,
                }
            })
            .collect();

        Ok(ValueTable {
            symbols: positions
                .positions()
                .iter()
                .map(|p| p.symbol.clone())
                .collect(),
            rows,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn rows(&self) -> &[ValueRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn value(&self, symbol: &str, row: usize) -> Option<f64> {
        let column = self.symbols.iter().position(|s| s == symbol)?;
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
