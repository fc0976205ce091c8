//! Configuration validation.
//!
//! Validates all `[backtest]` fields before a run starts.

use crate::domain::allocation::parse_allocations;
use crate::domain::error::HoldfastError;
use crate::domain::price_table::Interval;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), HoldfastError> {
    validate_amount(config)?;
    validate_allocations(config)?;
    validate_interval(config)?;
    Ok(())
}

fn validate_amount(config: &dyn ConfigPort) -> Result<(), HoldfastError> {
    let value = config
        .get_string("backtest", "amount")
        .ok_or_else(|| HoldfastError::ConfigMissing {
            section: "backtest".to_string(),
            key: "amount".to_string(),
        })?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| HoldfastError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "amount".to_string(),
            reason: "amount must be a non-negative integer".to_string(),
        })?;
    Ok(())
}

fn validate_allocations(config: &dyn ConfigPort) -> Result<(), HoldfastError> {
    let value = config
        .get_string("backtest", "allocations")
        .ok_or_else(|| HoldfastError::ConfigMissing {
            section: "backtest".to_string(),
            key: "allocations".to_string(),
        })?;
    parse_allocations(&value).map_err(|e| HoldfastError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "allocations".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), HoldfastError> {
    match config.get_string("backtest", "interval") {
        None => Ok(()),
        Some(value) => match Interval::parse(&value) {
            Some(_) => Ok(()),
            None => Err(HoldfastError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "interval".to_string(),
                reason: "expected daily, weekly or monthly".to_string(),
            }),
        },
    }
}
