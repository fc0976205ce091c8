//! Domain error types.

/// Top-level error type for holdfast.
///
/// Every fatal condition aborts the whole run; a gap in a fetched price
/// series is not an error and travels through the tables as `None`.
#[derive(Debug, thiserror::Error)]
pub enum HoldfastError {
    #[error("no symbols to backtest after filtering")]
    NoSymbols,

    #[error("no trade history for {symbol}")]
    NoTradeHistory { symbol: String },

    #[error("no price data for {symbol} in fetched table")]
    MissingPriceData { symbol: String },

    #[error("price source returned an empty table")]
    EmptyPriceTable,

    #[error("price source error for {symbol}: {reason}")]
    Source { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Allocation(#[from] crate::domain::allocation::AllocationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HoldfastError> for std::process::ExitCode {
    fn from(err: &HoldfastError) -> Self {
        let code: u8 = match err {
            HoldfastError::Io(_) => 1,
            HoldfastError::ConfigParse { .. }
            | HoldfastError::ConfigMissing { .. }
            | HoldfastError::ConfigInvalid { .. } => 2,
            HoldfastError::Allocation(_) | HoldfastError::NoSymbols => 3,
            HoldfastError::Source { .. } => 4,
            HoldfastError::NoTradeHistory { .. }
            | HoldfastError::MissingPriceData { .. }
            | HoldfastError::EmptyPriceTable => 5,
        };
        std::process::ExitCode::from(code)
    }
}
