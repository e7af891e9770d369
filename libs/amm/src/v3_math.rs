//! Concentrated-liquidity (Uniswap V3 family) math
//!
//! Integer-exact ports of the pool's `TickMath`, `SqrtPriceMath` and
//! `SwapMath` libraries plus the exact-input swap loop, so an in-process
//! quote equals what the pool (and its quoter) return on-chain.
//!
//! Prices are `sqrt(token1/token0) * 2^96` (`sqrtPriceX96`); fees are in
//! hundredths of a basis point (pips, `3000` = 0.3%).

use std::collections::BTreeMap;

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{MathError, Result};
use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};

/// V3 tick math constants
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;
/// `sqrt_ratio_at_tick(MIN_TICK)`
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);
/// `sqrt_ratio_at_tick(MAX_TICK)`
pub const MAX_SQRT_RATIO: U256 = U256([0x5d951d5263988d26, 0xefd1fc6a50648849, 0xfffd8963, 0]);
/// 2^96
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);
/// Fee denominator for concentrated-liquidity pools (pips)
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// `2^128 / sqrt(1.0001)^(2^i)` as Q128.128, index 0 is the odd-tick factor
const TICK_RATIOS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

fn u160_max() -> U256 {
    (U256::one() << 160) - U256::one()
}

/// `sqrt(1.0001^tick) * 2^96`, rounded up
pub fn sqrt_ratio_at_tick(tick: i32) -> Result<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfRange { tick });
    }
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(TICK_RATIOS[0])
    } else {
        U256::one() << 128
    };
    for (bit, factor) in TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the result round-trips through tick_at_sqrt_ratio
    let remainder = ratio & U256::from(u32::MAX);
    Ok((ratio >> 32) + if remainder.is_zero() { U256::zero() } else { U256::one() })
}

/// Greatest tick whose sqrt ratio is `<= sqrt_price_x96`
pub fn tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(MathError::SqrtPriceOutOfRange { sqrt_price_x96 });
    }
    // ratio(low) <= price < ratio(high)
    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid;
        }
    }
    Ok(low)
}

/// Token0 owed between two prices: `L * (sqrtB - sqrtA) / (sqrtA * sqrtB)`
pub fn get_amount0_delta(
    sqrt_ratio_a: U256,
    sqrt_ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = if sqrt_ratio_a > sqrt_ratio_b {
        (sqrt_ratio_b, sqrt_ratio_a)
    } else {
        (sqrt_ratio_a, sqrt_ratio_b)
    };
    if lower.is_zero() {
        return Err(MathError::SqrtPriceOutOfRange {
            sqrt_price_x96: lower,
        });
    }

    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = upper - lower;

    if round_up {
        div_rounding_up(mul_div_rounding_up(numerator1, numerator2, upper)?, lower)
    } else {
        Ok(mul_div(numerator1, numerator2, upper)? / lower)
    }
}

/// Token1 owed between two prices: `L * (sqrtB - sqrtA)`
pub fn get_amount1_delta(
    sqrt_ratio_a: U256,
    sqrt_ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = if sqrt_ratio_a > sqrt_ratio_b {
        (sqrt_ratio_b, sqrt_ratio_a)
    } else {
        (sqrt_ratio_a, sqrt_ratio_b)
    };
    if round_up {
        mul_div_rounding_up(U256::from(liquidity), upper - lower, Q96)
    } else {
        mul_div(U256::from(liquidity), upper - lower, Q96)
    }
}

fn next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator1 = U256::from(liquidity) << 96;

    if let Some(product) = amount.checked_mul(sqrt_price_x96) {
        if let Some(denominator) = numerator1.checked_add(product) {
            return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
        }
    }

    let denominator = (numerator1 / sqrt_price_x96)
        .checked_add(amount)
        .ok_or(MathError::Overflow {
            operation: "next sqrt price from amount0",
        })?;
    div_rounding_up(numerator1, denominator)
}

fn next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256> {
    let liquidity = U256::from(liquidity);
    let quotient = if amount <= u160_max() {
        (amount << 96) / liquidity
    } else {
        mul_div(amount, Q96, liquidity)?
    };

    let next = sqrt_price_x96
        .checked_add(quotient)
        .ok_or(MathError::Overflow {
            operation: "next sqrt price from amount1",
        })?;
    if next > u160_max() {
        return Err(MathError::SqrtPriceOutOfRange {
            sqrt_price_x96: next,
        });
    }
    Ok(next)
}

/// Price reached after adding `amount_in` of the input token at constant liquidity
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::SqrtPriceOutOfRange { sqrt_price_x96 });
    }
    if liquidity == 0 {
        return Err(MathError::ZeroLiquidity);
    }

    if zero_for_one {
        next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in)
    } else {
        next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in)
    }
}

/// One step of an exact-input swap toward `sqrt_price_target_x96`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next_x96: U256,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
}

/// Exact-input `SwapMath.computeSwapStep`
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
    fee_pips: u32,
) -> Result<SwapStep> {
    if fee_pips >= FEE_DENOMINATOR {
        return Err(MathError::InvalidFee {
            fee: fee_pips,
            denominator: FEE_DENOMINATOR,
        });
    }
    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let fee_complement = U256::from(FEE_DENOMINATOR - fee_pips);

    let amount_remaining_less_fee =
        mul_div(amount_remaining, fee_complement, U256::from(FEE_DENOMINATOR))?;

    let amount_to_target = if zero_for_one {
        get_amount0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)?
    } else {
        get_amount1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)?
    };

    let sqrt_price_next_x96 = if amount_remaining_less_fee >= amount_to_target {
        sqrt_price_target_x96
    } else {
        get_next_sqrt_price_from_input(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?
    };
    let reached_target = sqrt_price_next_x96 == sqrt_price_target_x96;

    let (amount_in, amount_out) = if zero_for_one {
        let amount_in = if reached_target {
            amount_to_target
        } else {
            get_amount0_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, true)?
        };
        let amount_out =
            get_amount1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)?;
        (amount_in, amount_out)
    } else {
        let amount_in = if reached_target {
            amount_to_target
        } else {
            get_amount1_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, true)?
        };
        let amount_out =
            get_amount0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)?;
        (amount_in, amount_out)
    };

    let fee_amount = if !reached_target {
        // Remainder of the input is taken entirely as fee
        amount_remaining
            .checked_sub(amount_in)
            .ok_or(MathError::Overflow {
                operation: "swap step fee",
            })?
    } else {
        mul_div_rounding_up(amount_in, U256::from(fee_pips), fee_complement)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

/// Output at the pre-trade price `(sqrtPriceX96 / 2^96)^2`, net of fee
pub fn spot_amount_out(
    sqrt_price_x96: U256,
    fee_pips: u32,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::SqrtPriceOutOfRange { sqrt_price_x96 });
    }
    if fee_pips > FEE_DENOMINATOR {
        return Err(MathError::InvalidFee {
            fee: fee_pips,
            denominator: FEE_DENOMINATOR,
        });
    }
    let amount_less_fee = mul_div(
        amount_in,
        U256::from(FEE_DENOMINATOR - fee_pips),
        U256::from(FEE_DENOMINATOR),
    )?;

    if zero_for_one {
        let partial = mul_div(amount_less_fee, sqrt_price_x96, Q96)?;
        mul_div(partial, sqrt_price_x96, Q96)
    } else {
        let partial = mul_div(amount_less_fee, Q96, sqrt_price_x96)?;
        mul_div(partial, Q96, sqrt_price_x96)
    }
}

fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    let next = if delta < 0 {
        liquidity.checked_sub(delta.unsigned_abs())
    } else {
        liquidity.checked_add(delta.unsigned_abs())
    };
    next.ok_or(MathError::LiquidityOverflow { liquidity, delta })
}

/// Pool snapshot with its initialized ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// Active in-range liquidity
    pub liquidity: u128,
    pub fee_pips: u32, // Fee in pips (3000 = 0.3%)
    pub tick_spacing: i32,
    /// Initialized ticks mapped to their `liquidityNet`
    pub ticks: BTreeMap<i32, i128>,
}

/// Result of an exact-input swap simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Input actually consumed, fee included
    pub amount_in: U256,
    pub amount_out: U256,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    pub ticks_crossed: u32,
}

impl V3PoolState {
    /// Empty pool at `sqrt_price_x96`
    pub fn new(sqrt_price_x96: U256, fee_pips: u32, tick_spacing: i32) -> Result<Self> {
        if tick_spacing <= 0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self {
            sqrt_price_x96,
            tick: tick_at_sqrt_ratio(sqrt_price_x96)?,
            liquidity: 0,
            fee_pips,
            tick_spacing,
            ticks: BTreeMap::new(),
        })
    }

    /// Adds a liquidity position over `[tick_lower, tick_upper)`
    pub fn with_position(mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<Self> {
        for tick in [tick_lower, tick_upper] {
            if !(MIN_TICK..=MAX_TICK).contains(&tick) || tick % self.tick_spacing != 0 {
                return Err(MathError::TickOutOfRange { tick });
            }
        }
        if tick_lower >= tick_upper {
            return Err(MathError::TickOutOfRange { tick: tick_upper });
        }
        let delta = i128::try_from(liquidity).map_err(|_| MathError::Overflow {
            operation: "position liquidity",
        })?;

        let lower = self.ticks.entry(tick_lower).or_insert(0);
        *lower = lower.checked_add(delta).ok_or(MathError::LiquidityOverflow {
            liquidity,
            delta,
        })?;
        let upper = self.ticks.entry(tick_upper).or_insert(0);
        *upper = upper.checked_sub(delta).ok_or(MathError::LiquidityOverflow {
            liquidity,
            delta: -delta,
        })?;

        if tick_lower <= self.tick && self.tick < tick_upper {
            self.liquidity = add_liquidity_delta(self.liquidity, delta)?;
        }
        Ok(self)
    }

    /// Next initialized tick within one bitmap word (256 compressed ticks),
    /// or the word boundary when none is initialized there
    fn next_initialized_tick_within_one_word(&self, tick: i32, lte: bool) -> (i32, bool) {
        let spacing = self.tick_spacing;
        let mut compressed = tick / spacing;
        if tick < 0 && tick % spacing != 0 {
            compressed -= 1;
        }

        if lte {
            let word_start = compressed - compressed.rem_euclid(256);
            let lower = word_start * spacing;
            match self.ticks.range(lower..=compressed * spacing).next_back() {
                Some((&initialized, _)) => (initialized, true),
                None => (lower, false),
            }
        } else {
            let next = compressed + 1;
            let word_end = next - next.rem_euclid(256) + 255;
            let upper = word_end * spacing;
            match self.ticks.range(next * spacing..=upper).next() {
                Some((&initialized, _)) => (initialized, true),
                None => (upper, false),
            }
        }
    }

    /// Exact-input swap of `amount_in`, walking initialized ticks
    ///
    /// Stops early at the price limit when liquidity runs out, in which case
    /// `SwapOutcome::amount_in` is less than requested.
    pub fn simulate_exact_input(&self, amount_in: U256, zero_for_one: bool) -> Result<SwapOutcome> {
        let price_limit = if zero_for_one {
            MIN_SQRT_RATIO + U256::one()
        } else {
            MAX_SQRT_RATIO - U256::one()
        };

        let mut outcome = SwapOutcome {
            amount_in: U256::zero(),
            amount_out: U256::zero(),
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick,
            liquidity: self.liquidity,
            ticks_crossed: 0,
        };
        let at_limit = if zero_for_one {
            self.sqrt_price_x96 <= price_limit
        } else {
            self.sqrt_price_x96 >= price_limit
        };
        if amount_in.is_zero() || at_limit {
            return Ok(outcome);
        }

        let mut remaining = amount_in;
        while !remaining.is_zero() && outcome.sqrt_price_x96 != price_limit {
            let price_start = outcome.sqrt_price_x96;
            let (tick_next, initialized) =
                self.next_initialized_tick_within_one_word(outcome.tick, zero_for_one);
            let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
            let sqrt_price_next = sqrt_ratio_at_tick(tick_next)?;

            let target = if zero_for_one {
                sqrt_price_next.max(price_limit)
            } else {
                sqrt_price_next.min(price_limit)
            };

            let step = compute_swap_step(
                outcome.sqrt_price_x96,
                target,
                outcome.liquidity,
                remaining,
                self.fee_pips,
            )?;
            outcome.sqrt_price_x96 = step.sqrt_price_next_x96;
            remaining = remaining
                .checked_sub(step.amount_in + step.fee_amount)
                .ok_or(MathError::Overflow {
                    operation: "swap remaining",
                })?;
            outcome.amount_out = outcome
                .amount_out
                .checked_add(step.amount_out)
                .ok_or(MathError::Overflow {
                    operation: "swap output",
                })?;

            if outcome.sqrt_price_x96 == sqrt_price_next {
                if initialized {
                    let net = self.ticks.get(&tick_next).copied().unwrap_or_default();
                    let net = if zero_for_one { -net } else { net };
                    outcome.liquidity = add_liquidity_delta(outcome.liquidity, net)?;
                    outcome.ticks_crossed += 1;
                    trace!(tick = tick_next, liquidity = outcome.liquidity, "crossed tick");
                }
                outcome.tick = if zero_for_one { tick_next - 1 } else { tick_next };
            } else if outcome.sqrt_price_x96 != price_start {
                outcome.tick = tick_at_sqrt_ratio(outcome.sqrt_price_x96)?;
            }
        }

        outcome.amount_in = amount_in - remaining;
        Ok(outcome)
    }

    /// Output at the current price with no price impact, net of fee
    pub fn spot_amount_out(&self, amount_in: U256, zero_for_one: bool) -> Result<U256> {
        spot_amount_out(self.sqrt_price_x96, self.fee_pips, amount_in, zero_for_one)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(value: &str) -> U256 {
        U256::from_dec_str(value).unwrap()
    }

    #[test]
    fn test_sqrt_ratio_bounds() {
        assert_eq!(sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(
            MAX_SQRT_RATIO,
            u("1461446703485210103287273052203988822378723970342")
        );
        assert_eq!(sqrt_ratio_at_tick(0).unwrap(), Q96);
        assert!(sqrt_ratio_at_tick(MAX_TICK + 1).is_err());
        assert!(sqrt_ratio_at_tick(MIN_TICK - 1).is_err());
    }

    #[test]
    fn test_tick_round_trip() {
        for tick in [MIN_TICK, -200_000, -60, -1, 0, 1, 60, 276_324, MAX_TICK - 1] {
            let ratio = sqrt_ratio_at_tick(tick).unwrap();
            assert_eq!(tick_at_sqrt_ratio(ratio).unwrap(), tick);
            if tick > MIN_TICK {
                assert_eq!(tick_at_sqrt_ratio(ratio - 1).unwrap(), tick - 1);
            }
        }
        assert!(tick_at_sqrt_ratio(MAX_SQRT_RATIO).is_err());
    }

    #[test]
    fn test_amount_deltas_over_doubling() {
        // sqrt price 1 -> 2: token1 = L, token0 = L/2
        let liquidity = 2_000_000_000_000_000_000u128;
        let two_q96 = Q96 * 2;
        assert_eq!(
            get_amount1_delta(Q96, two_q96, liquidity, false).unwrap(),
            U256::from(liquidity)
        );
        assert_eq!(
            get_amount0_delta(two_q96, Q96, liquidity, true).unwrap(),
            U256::from(liquidity / 2)
        );
    }

    #[test]
    fn test_swap_step_capped_at_target() {
        // Price 1.0 -> sqrt(1.01), one for zero
        let target = u("79623317895830914510639640423");
        let step = compute_swap_step(
            Q96,
            target,
            2_000_000_000_000_000_000,
            u("1000000000000000000"),
            600,
        )
        .unwrap();
        assert_eq!(step.sqrt_price_next_x96, target);
        assert_eq!(step.amount_in, u("9975124224178055"));
        assert_eq!(step.amount_out, u("9925619580021728"));
        assert_eq!(step.fee_amount, u("5988667735148"));
    }

    #[test]
    fn test_swap_step_fully_spent() {
        // Price 1.0 toward sqrt(10), input exhausted before target
        let target = u("250541448375047931186413801569");
        let step = compute_swap_step(
            Q96,
            target,
            2_000_000_000_000_000_000,
            u("1000000000000000000"),
            600,
        )
        .unwrap();
        assert!(step.sqrt_price_next_x96 < target);
        assert_eq!(step.sqrt_price_next_x96, u("118818475322642227089037862318"));
        assert_eq!(step.amount_in, u("999400000000000000"));
        assert_eq!(step.amount_out, u("666399946655997866"));
        assert_eq!(step.fee_amount, u("600000000000000"));
        assert_eq!(step.amount_in + step.fee_amount, u("1000000000000000000"));
    }

    #[test]
    fn test_swap_within_range_matches_single_step() {
        let pool = V3PoolState::new(Q96, 3000, 60)
            .unwrap()
            .with_position(-6000, 6000, 1_000_000_000_000_000_000_000)
            .unwrap();
        let amount = U256::from(1_000_000_000_000_000_000u128);

        let outcome = pool.simulate_exact_input(amount, true).unwrap();
        let step = compute_swap_step(
            Q96,
            sqrt_ratio_at_tick(-6000).unwrap(),
            pool.liquidity,
            amount,
            3000,
        )
        .unwrap();

        assert_eq!(outcome.amount_out, step.amount_out);
        assert_eq!(outcome.amount_in, amount);
        assert_eq!(outcome.ticks_crossed, 0);
        assert!(outcome.tick < 0);
        assert!(outcome.amount_out < pool.spot_amount_out(amount, true).unwrap());
    }

    #[test]
    fn test_swap_exhausts_liquidity() {
        let liquidity = 1_000_000_000_000_000_000u128;
        let pool = V3PoolState::new(Q96, 500, 10)
            .unwrap()
            .with_position(-100, 100, liquidity)
            .unwrap();

        // All token1 in range: L * (sqrt(P) - sqrt(P_lower))
        let available =
            get_amount1_delta(sqrt_ratio_at_tick(-100).unwrap(), Q96, liquidity, false).unwrap();
        let huge = U256::exp10(30);
        let outcome = pool.simulate_exact_input(huge, true).unwrap();

        assert_eq!(outcome.amount_out, available);
        assert!(outcome.amount_in < huge);
        assert_eq!(outcome.liquidity, 0);
        assert_eq!(outcome.ticks_crossed, 1);
        assert_eq!(outcome.sqrt_price_x96, MIN_SQRT_RATIO + 1);
    }

    #[test]
    fn test_crossing_tick_changes_liquidity() {
        let pool = V3PoolState::new(Q96, 3000, 60)
            .unwrap()
            .with_position(-120, 120, 5_000_000_000_000_000_000)
            .unwrap()
            .with_position(-6000, 6000, 1_000_000_000_000_000_000)
            .unwrap();
        assert_eq!(pool.liquidity, 6_000_000_000_000_000_000);

        let outcome = pool
            .simulate_exact_input(U256::exp10(17), false)
            .unwrap();
        assert_eq!(outcome.ticks_crossed, 1);
        assert_eq!(outcome.liquidity, 1_000_000_000_000_000_000);
        assert!(outcome.tick >= 120);
    }

    #[test]
    fn test_zero_input_is_noop() {
        let pool = V3PoolState::new(Q96, 3000, 60).unwrap();
        let outcome = pool.simulate_exact_input(U256::zero(), true).unwrap();
        assert!(outcome.amount_out.is_zero());
        assert_eq!(outcome.sqrt_price_x96, Q96);
    }

    #[test]
    fn test_spot_output_direction() {
        // sqrt price 2 => price 4 token1 per token0
        let sqrt_price = Q96 * 2;
        let out = spot_amount_out(sqrt_price, 0, U256::from(1_000), true).unwrap();
        assert_eq!(out, U256::from(4_000));
        let back = spot_amount_out(sqrt_price, 0, U256::from(4_000), false).unwrap();
        assert_eq!(back, U256::from(1_000));
        let with_fee = spot_amount_out(sqrt_price, 3000, U256::from(1_000_000), true).unwrap();
        assert_eq!(with_fee, U256::from(3_988_000));
    }

    #[test]
    fn test_position_validation() {
        let pool = V3PoolState::new(Q96, 3000, 60).unwrap();
        assert!(pool.clone().with_position(-61, 60, 1).is_err());
        assert!(pool.clone().with_position(60, -60, 1).is_err());
        assert!(pool.with_position(-60, 60, 1).is_ok());
    }
}
