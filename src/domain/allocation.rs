//! Allocation specification: symbols with target percentage ratios.
//!
//! Parses allocation lists from configuration (`SPY:60,TLT:40`) and filters
//! unusable symbols before anything reaches the price source. Ratios are
//! percentages; the sum is not enforced, caller input is trusted.

use std::collections::HashSet;

/// One target allocation: a symbol and its percentage of the initial cash.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub symbol: String,
    pub ratio: f64,
}

/// Ordered set of allocations. Order is preserved end to end so table
/// columns and chart lines come out in the order the user wrote them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationSpec {
    entries: Vec<Allocation>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AllocationError {
    #[error("empty token in allocation list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("missing ratio for {0} (expected SYMBOL:RATIO)")]
    MissingRatio(String),

    #[error("invalid ratio for {symbol}: {value}")]
    InvalidRatio { symbol: String, value: String },
}

impl AllocationSpec {
    pub fn new(entries: Vec<Allocation>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Allocation] {
        &self.entries
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|a| a.symbol.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop entries whose symbol is empty after trimming. Ratios are kept
    /// as-is; a zero ratio is a valid request for zero units.
    pub fn sanitized(&self) -> AllocationSpec {
        AllocationSpec {
            entries: self
                .entries
                .iter()
                .filter(|a| !a.symbol.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// Parse an allocation list of the form `SPY:60,TLT:40`.
///
/// Symbols are trimmed and uppercased. Empty tokens, duplicate symbols,
/// missing or non-numeric or negative ratios are rejected here so the
/// pipeline only ever sees well-formed input.
pub fn parse_allocations(input: &str) -> Result<AllocationSpec, AllocationError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(AllocationError::EmptyToken);
        }

        let (symbol, ratio_str) = match trimmed.split_once(':') {
            Some((s, r)) => (s.trim().to_uppercase(), r.trim()),
            None => return Err(AllocationError::MissingRatio(trimmed.to_uppercase())),
        };
        if symbol.is_empty() {
            return Err(AllocationError::EmptyToken);
        }
        if seen.contains(&symbol) {
            return Err(AllocationError::DuplicateSymbol(symbol));
        }

        let ratio: f64 = ratio_str
            .parse()
            .map_err(|_| AllocationError::InvalidRatio {
                symbol: symbol.clone(),
                value: ratio_str.to_string(),
            })?;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(AllocationError::InvalidRatio {
                symbol,
                value: ratio_str.to_string(),
            });
        }

        seen.insert(symbol.clone());
        entries.push(Allocation { symbol, ratio });
    }

    Ok(AllocationSpec { entries })
}
