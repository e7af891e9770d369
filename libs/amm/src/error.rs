//! Error types for AMM math

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

/// Failures raised where the ledger's math libraries would revert
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Tick {tick} outside [-887272, 887272]")]
    TickOutOfRange { tick: i32 },

    #[error("sqrt price {sqrt_price_x96} outside the representable range")]
    SqrtPriceOutOfRange { sqrt_price_x96: ethereum_types::U256 },

    #[error("Pool has no liquidity")]
    ZeroLiquidity,

    #[error("Liquidity delta {delta} applied to {liquidity} leaves the u128 range")]
    LiquidityOverflow { liquidity: u128, delta: i128 },

    #[error("Fee {fee} exceeds denominator {denominator}")]
    InvalidFee { fee: u32, denominator: u32 },
}
