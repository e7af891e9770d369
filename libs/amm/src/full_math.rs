//! 512-bit intermediate multiply/divide helpers
//!
//! Mirrors the ledger's `FullMath` library: the product `a * b` is carried in
//! a `U512` so the result is exact whenever the quotient fits in 256 bits.

use ethereum_types::{U256, U512};

use crate::error::{MathError, Result};

/// `floor(a * b / denominator)` with a full-width intermediate product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| MathError::Overflow {
        operation: "mul_div",
    })
}

/// `ceil(a * b / denominator)`.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let denominator_wide = U512::from(denominator);
    let quotient = U256::try_from(product / denominator_wide).map_err(|_| MathError::Overflow {
        operation: "mul_div_rounding_up",
    })?;

    if (product % denominator_wide).is_zero() {
        Ok(quotient)
    } else {
        quotient.checked_add(U256::one()).ok_or(MathError::Overflow {
            operation: "mul_div_rounding_up",
        })
    }
}

/// `ceil(x / y)`.
pub fn div_rounding_up(x: U256, y: U256) -> Result<U256> {
    if y.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = x / y;
    if (x % y).is_zero() {
        Ok(quotient)
    } else {
        // x / y < U256::MAX whenever y > 1, so the increment cannot wrap
        Ok(quotient + U256::one())
    }
}
