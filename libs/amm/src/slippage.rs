//! Slippage measurement in basis points

use ethereum_types::U256;

use crate::error::{MathError, Result};
use crate::full_math::mul_div;

/// `|actual - expected| * 10000 / expected`
///
/// Fails with `DivisionByZero` when `expected` is zero; callers treat that as
/// an unpriceable market.
pub fn deviation_bps(actual: U256, expected: U256) -> Result<U256> {
    if expected.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let difference = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    mul_div(difference, U256::from(10_000u32), expected)
}

/// True when the deviation is within `max_slippage_bps`
pub fn within_tolerance(actual: U256, expected: U256, max_slippage_bps: u32) -> bool {
    match deviation_bps(actual, expected) {
        Ok(bps) => bps <= U256::from(max_slippage_bps),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_is_symmetric_in_sign() {
        let below = deviation_bps(U256::from(9_900), U256::from(10_000)).unwrap();
        let above = deviation_bps(U256::from(10_100), U256::from(10_000)).unwrap();
        assert_eq!(below, U256::from(100));
        assert_eq!(above, U256::from(100));
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        assert!(within_tolerance(U256::from(9_500), U256::from(10_000), 500));
        assert!(!within_tolerance(U256::from(9_499), U256::from(10_000), 500));
    }

    #[test]
    fn test_zero_expected_never_within_tolerance() {
        assert!(!within_tolerance(U256::zero(), U256::zero(), 10_000));
        assert_eq!(
            deviation_bps(U256::one(), U256::zero()),
            Err(MathError::DivisionByZero)
        );
    }
}
