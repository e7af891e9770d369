//! Error types for the scanner

use dex::{Address, DexError};
use amm::MathError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;

/// Main error type for scanner operations
///
/// Absence of liquidity is not an error: quote paths report it as a zero
/// rate and the zero address. Only the trade simulator turns it into
/// [`ScannerError::TradeAborted`].
#[derive(Debug, Error)]
pub enum ScannerError {
    /// Malformed registry or reference configuration
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Unknown dex id {dex_id}")]
    UnknownDex { dex_id: u8 },

    /// Fee is not one the dex was registered with
    #[error("Fee {fee} is not a registered tier of dex {dex_id}")]
    UnknownFeeTier { dex_id: u8, fee: u32 },

    /// Token path must be exactly one longer than the exchange list
    #[error("Path of {tokens} tokens does not fit {exchanges} exchanges")]
    PathLength { tokens: usize, exchanges: usize },

    #[error("Pairs {start}..{start}+{count} exceed the factory's {total} pairs")]
    OutOfRange { start: u64, count: u64, total: u64 },

    /// Parallel input arrays of different lengths
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Trade aborted at hop {hop} ({token_in:?} -> {token_out:?}): {reason}")]
    TradeAborted {
        hop: usize,
        token_in: Address,
        token_out: Address,
        reason: String,
    },

    /// Codec range errors
    #[error(transparent)]
    Dex(#[from] DexError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ScannerError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        ScannerError::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn check_length(field: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ScannerError::LengthMismatch {
                field,
                expected,
                actual,
            })
        }
    }
}
