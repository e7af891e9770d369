//! Concentrated-liquidity pools (Uniswap V3)
//!
//! Quotes go through the dex's quoter contract, which runs the real swap
//! across initialized ticks, so a pool whose price sits between positions
//! still quotes. The slippage reference is priced from `slot0`.

use amm::v3_math;
use async_trait::async_trait;
use dex::{concentrated_pool_address, Address, DexProtocol, U256};
use tracing::trace;

use super::{zero_for_one, ProtocolFamily};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::DexConfig;

pub struct ConcentratedLiquidity;

#[async_trait]
impl ProtocolFamily for ConcentratedLiquidity {
    fn protocol(&self) -> DexProtocol {
        DexProtocol::ConcentratedLiquidity
    }

    fn pool_address(&self, dex: &DexConfig, token0: Address, token1: Address, fee: u32) -> Address {
        concentrated_pool_address(dex.pool_deployer, token0, token1, fee, dex.init_code_hash)
    }

    async fn quote(
        &self,
        ledger: &dyn Ledger,
        dex: &DexConfig,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        if amount_in.is_zero() {
            return Ok(U256::zero());
        }
        let Some(state) = ledger.concentrated_pool_state(pool).await? else {
            trace!("No pool deployed at {:?}", pool);
            return Ok(U256::zero());
        };
        let token_out = match zero_for_one(state.token0, state.token1, token_in) {
            Some(true) => state.token1,
            Some(false) => state.token0,
            None => return Ok(U256::zero()),
        };

        Ok(ledger
            .quote_exact_input_single(dex.quoter, token_in, token_out, fee, amount_in)
            .await?)
    }

    async fn expected_output(
        &self,
        ledger: &dyn Ledger,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        let Some(state) = ledger.concentrated_pool_state(pool).await? else {
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
            fee,
            amount_in,
            direction,
        )?)
    }
}
