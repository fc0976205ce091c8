//! Chart rendering port trait.

use crate::domain::error::HoldfastError;
use crate::domain::value_table::ValueTable;

/// Port for rendering a valued series. The pipeline itself never draws.
pub trait ChartPort {
    fn render(&self, values: &ValueTable, output_path: &str) -> Result<(), HoldfastError>;
}
