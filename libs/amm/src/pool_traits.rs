//! Pool trait definitions for unified AMM interface

use ethereum_types::U256;

use crate::error::Result;
use crate::v2_math::{V2Math, V2PoolState};
use crate::v3_math::V3PoolState;

/// A pool viewed in one trade direction
pub trait AmmPool {
    /// Exact output the pool would pay for `amount_in`
    fn amount_out(&self, amount_in: U256) -> Result<U256>;

    /// Output at the pre-trade price, net of fee
    fn spot_amount_out(&self, amount_in: U256) -> Result<U256>;
}

impl AmmPool for V2PoolState {
    fn amount_out(&self, amount_in: U256) -> Result<U256> {
        V2Math::get_amount_out(amount_in, self)
    }

    fn spot_amount_out(&self, amount_in: U256) -> Result<U256> {
        V2Math::spot_amount_out(amount_in, self)
    }
}

/// A concentrated-liquidity pool with a fixed swap direction
#[derive(Debug, Clone, Copy)]
pub struct V3Swap<'a> {
    pub pool: &'a V3PoolState,
    pub zero_for_one: bool,
}

impl AmmPool for V3Swap<'_> {
    fn amount_out(&self, amount_in: U256) -> Result<U256> {
        Ok(self
            .pool
            .simulate_exact_input(amount_in, self.zero_for_one)?
            .amount_out)
    }

    fn spot_amount_out(&self, amount_in: U256) -> Result<U256> {
        self.pool.spot_amount_out(amount_in, self.zero_for_one)
    }
}
