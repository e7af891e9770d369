//! AMM protocol families
//!
//! Each family knows how to derive its pool addresses and how to price a
//! swap through one of its pools. Components dispatch on
//! [`DexConfig::protocol`] through [`family`], so supporting another family
//! means adding an implementation and a match arm.

mod algebra;
mod concentrated;
mod constant_product;

pub use algebra::Algebra;
pub use concentrated::ConcentratedLiquidity;
pub use constant_product::ConstantProduct;

use async_trait::async_trait;
use dex::{Address, DexProtocol, U256};

use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::DexConfig;

#[async_trait]
pub trait ProtocolFamily: Send + Sync {
    fn protocol(&self) -> DexProtocol;

    /// Deterministic address of the pool for sorted, distinct tokens
    fn pool_address(&self, dex: &DexConfig, token0: Address, token1: Address, fee: u32) -> Address;

    /// Exact output of selling `amount_in` of `token_in` into `pool`
    ///
    /// Zero when the pool is not deployed, does not hold `token_in` or has
    /// no liquidity.
    async fn quote(
        &self,
        ledger: &dyn Ledger,
        dex: &DexConfig,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256>;

    /// Output at the pool's pre-trade price net of fee, the slippage-free
    /// reference for [`ProtocolFamily::quote`]
    async fn expected_output(
        &self,
        ledger: &dyn Ledger,
        pool: Address,
        fee: u32,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256>;
}

/// Implementation for `protocol`
pub fn family(protocol: DexProtocol) -> &'static dyn ProtocolFamily {
    match protocol {
        DexProtocol::ConstantProduct => &ConstantProduct,
        DexProtocol::ConcentratedLiquidity => &ConcentratedLiquidity,
        DexProtocol::Algebra => &Algebra,
    }
}

/// Swap direction for `token_in`, `None` when the pool does not hold it
pub(crate) fn zero_for_one(token0: Address, token1: Address, token_in: Address) -> Option<bool> {
    if token_in == token0 {
        Some(true)
    } else if token_in == token1 {
        Some(false)
    } else {
        None
    }
}
