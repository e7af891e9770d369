//! Algebra pools (QuickSwap V3)
//!
//! One pool per pair, deployed by a separate pool deployer, charging a
//! dynamic fee kept in `globalState`. The encoded fee of an exchange plays
//! no part: the quoter finds the pool from the tokens and the slippage
//! reference uses the pool's current fee.

use amm::v3_math;
use async_trait::async_trait;
use dex::{algebra_pool_address, Address, DexProtocol, U256};
use tracing::trace;

use super::{zero_for_one, ProtocolFamily};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::DexConfig;

pub struct Algebra;

#[async_trait]
impl ProtocolFamily for Algebra {
    fn protocol(&self) -> DexProtocol {
        DexProtocol::Algebra
    }

    fn pool_address(&self, dex: &DexConfig, token0: Address, token1: Address, _fee: u32) -> Address {
        algebra_pool_address(dex.pool_deployer, token0, token1, dex.init_code_hash)
    }

    async fn quote(
        &self,
        ledger: &dyn Ledger,
        dex: &DexConfig,
        pool: Address,
        _fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        if amount_in.is_zero() {
            return Ok(U256::zero());
        }
        let Some(state) = ledger.algebra_pool_state(pool).await? else {
            trace!("No Algebra pool deployed at {:?}", pool);
            return Ok(U256::zero());
        };
        let token_out = match zero_for_one(state.token0, state.token1, token_in) {
            Some(true) => state.token1,
            Some(false) => state.token0,
            None => return Ok(U256::zero()),
        };

        Ok(ledger
            .quote_algebra_exact_input_single(dex.quoter, token_in, token_out, amount_in)
            .await?)
    }

    async fn expected_output(
        &self,
        ledger: &dyn Ledger,
        pool: Address,
        _fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        let Some(state) = ledger.algebra_pool_state(pool).await? else {
            return Ok(U256::zero());
        };
        let Some(direction) = zero_for_one(state.token0, state.token1, token_in) else {
            return Ok(U256::zero());
        };
        if state.sqrt_price_x96.is_zero() {
            return Ok(U256::zero());
        }

        Ok(v3_math::spot_amount_out(
            state.sqrt_price_x96,
            state.fee,
            amount_in,
            direction,
        )?)
    }
}
