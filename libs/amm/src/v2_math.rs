//! Constant-product (Uniswap V2 family) pricing with exact integer math
//!
//! Reproduces the pair contract's `getAmountOut`/`getAmountIn` bit-for-bit.
//! The pool fee is carried in basis points, so QuickSwap's 0.3% is `30`
//! and a 0.25% fork is `25`.

use ethereum_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::full_math::mul_div;

/// Fee denominator for constant-product pools (basis points)
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Reserves oriented in the trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct V2PoolState {
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub fee_bps: u32, // Fee in basis points (30 = 0.3%)
}

impl V2PoolState {
    /// Orient raw pair reserves for a swap. `zero_for_one` sells token0.
    pub fn oriented(reserve0: U256, reserve1: U256, fee_bps: u32, zero_for_one: bool) -> Self {
        let (reserve_in, reserve_out) = if zero_for_one {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };
        Self {
            reserve_in,
            reserve_out,
            fee_bps,
        }
    }

    pub fn has_liquidity(&self) -> bool {
        !self.reserve_in.is_zero() && !self.reserve_out.is_zero()
    }
}

/// Constant-product math
pub struct V2Math;

impl V2Math {
    fn fee_multiplier(fee_bps: u32) -> Result<U256> {
        if fee_bps > BPS_DENOMINATOR {
            return Err(MathError::InvalidFee {
                fee: fee_bps,
                denominator: BPS_DENOMINATOR,
            });
        }
        Ok(U256::from(BPS_DENOMINATOR - fee_bps))
    }

    /// Exact output for `amount_in`, truncating like the pair contract:
    ///
    /// `out = in*(10000-fee)*reserveOut / (reserveIn*10000 + in*(10000-fee))`
    ///
    /// Zero input or an empty side yields zero rather than an error.
    pub fn get_amount_out(amount_in: U256, pool: &V2PoolState) -> Result<U256> {
        if amount_in.is_zero() || !pool.has_liquidity() {
            return Ok(U256::zero());
        }

        let amount_in_with_fee = amount_in
            .checked_mul(Self::fee_multiplier(pool.fee_bps)?)
            .ok_or(MathError::Overflow {
                operation: "amount_in_with_fee",
            })?;
        let numerator = amount_in_with_fee
            .checked_mul(pool.reserve_out)
            .ok_or(MathError::Overflow {
                operation: "v2 numerator",
            })?;
        let denominator = pool
            .reserve_in
            .checked_mul(U256::from(BPS_DENOMINATOR))
            .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
            .ok_or(MathError::Overflow {
                operation: "v2 denominator",
            })?;

        Ok(numerator / denominator)
    }

    /// Output at the pre-trade marginal price, net of fee (no price impact)
    ///
    /// `in*(10000-fee)*reserveOut / (reserveIn*10000)`
    pub fn spot_amount_out(amount_in: U256, pool: &V2PoolState) -> Result<U256> {
        if amount_in.is_zero() || !pool.has_liquidity() {
            return Ok(U256::zero());
        }
        let amount_in_with_fee = amount_in
            .checked_mul(Self::fee_multiplier(pool.fee_bps)?)
            .ok_or(MathError::Overflow {
                operation: "amount_in_with_fee",
            })?;
        let denominator = pool
            .reserve_in
            .checked_mul(U256::from(BPS_DENOMINATOR))
            .ok_or(MathError::Overflow {
                operation: "spot denominator",
            })?;
        mul_div(amount_in_with_fee, pool.reserve_out, denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(reserve_in: u64, reserve_out: u64, fee_bps: u32) -> V2PoolState {
        V2PoolState {
            reserve_in: U256::from(reserve_in),
            reserve_out: U256::from(reserve_out),
            fee_bps,
        }
    }

    #[test]
    fn test_v2_output_calculation() {
        // 100 * 9970 * 2000 / (1000 * 10000 + 100 * 9970) = 181.3...
        let out = V2Math::get_amount_out(U256::from(100), &pool(1000, 2000, 30)).unwrap();
        assert_eq!(out, U256::from(181));
    }

    #[test]
    fn test_matches_router_997_over_1000_form() {
        // Router form: in*997*rOut / (rIn*1000 + in*997)
        let amount_in = U256::from(123_456_789u64);
        let state = pool(9_876_543_210, 5_555_555_555, 30);
        let router = amount_in * 997 * state.reserve_out
            / (state.reserve_in * 1000 + amount_in * 997);
        assert_eq!(V2Math::get_amount_out(amount_in, &state).unwrap(), router);
    }

    #[test]
    fn test_zero_liquidity_quotes_zero() {
        assert!(V2Math::get_amount_out(U256::from(100), &pool(0, 2000, 30))
            .unwrap()
            .is_zero());
        assert!(V2Math::get_amount_out(U256::zero(), &pool(1000, 2000, 30))
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_spot_bounds_actual_output() {
        let state = pool(1_000_000, 1_000_000, 30);
        let spot = V2Math::spot_amount_out(U256::from(10_000), &state).unwrap();
        let actual = V2Math::get_amount_out(U256::from(10_000), &state).unwrap();
        assert_eq!(spot, U256::from(9_970));
        assert!(actual < spot);
        // 10000 into 1M: ~1% impact
        let impact = crate::slippage::deviation_bps(actual, spot).unwrap();
        assert_eq!(impact, U256::from(99));
    }

    #[test]
    fn test_oriented_reserves() {
        let state = V2PoolState::oriented(U256::from(1), U256::from(2), 30, false);
        assert_eq!(state.reserve_in, U256::from(2));
        assert_eq!(state.reserve_out, U256::from(1));
    }

    #[test]
    fn test_invalid_fee_rejected() {
        assert!(matches!(
            V2Math::get_amount_out(U256::from(1), &pool(10, 10, 10_001)),
            Err(MathError::InvalidFee { .. })
        ));
    }
}
