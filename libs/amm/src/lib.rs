//! # AMM Math - Ledger-Exact DEX Pricing
//!
//! ## Purpose
//!
//! Integer-exact pricing for the two AMM families the scanner quotes:
//! constant-product pairs (Uniswap V2 and its forks) and concentrated-liquidity
//! pools (Uniswap V3). Every formula works on `U256` with a `U512` intermediate
//! and truncates where the contracts truncate, so a local quote equals the
//! on-chain one to the wei.
//!
//! ## Integration Points
//!
//! - **Constant product**: [`V2Math`] over reserves oriented by trade direction
//! - **Concentrated liquidity**: [`v3_math`] tick math, swap step and the
//!   tick-walking [`V3PoolState::simulate_exact_input`]
//! - **Slippage**: [`slippage::deviation_bps`] against the pre-trade spot output
//!
//! ## Units
//!
//! - Constant-product fees are basis points (`30` = 0.3%)
//! - Concentrated-liquidity fees are pips (`3000` = 0.3%)
//! - Amounts are raw token units; decimals never enter the math

pub mod error;
pub mod full_math;
pub mod pool_traits;
pub mod slippage;
pub mod v2_math;
pub mod v3_math;

pub use error::{MathError, Result};
pub use pool_traits::{AmmPool, V3Swap};
pub use v2_math::{V2Math, V2PoolState};
pub use v3_math::{SwapOutcome, V3PoolState};

/// Integer types used throughout the math
pub use ethereum_types::{U256, U512};
