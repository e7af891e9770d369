//! Constant-product pairs (Uniswap V2 and forks)

use amm::{AmmPool, V2PoolState};
use async_trait::async_trait;
use dex::{constant_product_pair_address, Address, DexProtocol, U256};
use tracing::trace;

use super::{zero_for_one, ProtocolFamily};
use crate::error::Result;
use crate::ledger::{Ledger, PairState};
use crate::registry::DexConfig;

/// Pairs are priced locally from their reserves
pub struct ConstantProduct;

async fn oriented_reserves(
    ledger: &dyn Ledger,
    pair: Address,
    fee_bps: u32,
    token_in: Address,
) -> Result<Option<V2PoolState>> {
    let Some(PairState {
        token0,
        token1,
        reserve0,
        reserve1,
    }) = ledger.pair_state(pair).await?
    else {
        trace!("No pair deployed at {:?}", pair);
        return Ok(None);
    };
    Ok(zero_for_one(token0, token1, token_in)
        .map(|direction| V2PoolState::oriented(reserve0, reserve1, fee_bps, direction)))
}

#[async_trait]
impl ProtocolFamily for ConstantProduct {
    fn protocol(&self) -> DexProtocol {
        DexProtocol::ConstantProduct
    }

    fn pool_address(&self, dex: &DexConfig, token0: Address, token1: Address, _fee: u32) -> Address {
        constant_product_pair_address(dex.pool_deployer, token0, token1, dex.init_code_hash)
    }

    async fn quote(
        &self,
        ledger: &dyn Ledger,
        _dex: &DexConfig,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        match oriented_reserves(ledger, pool, fee, token_in).await? {
            Some(reserves) => Ok(reserves.amount_out(amount_in)?),
            None => Ok(U256::zero()),
        }
    }

    async fn expected_output(
        &self,
        ledger: &dyn Ledger,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        match oriented_reserves(ledger, pool, fee, token_in).await? {
            Some(reserves) => Ok(reserves.spot_amount_out(amount_in)?),
            None => Ok(U256::zero()),
        }
    }
}
