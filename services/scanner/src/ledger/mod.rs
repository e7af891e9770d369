//! Ledger access
//!
//! The scanner reads pool state and runs swap simulations through the
//! [`Ledger`] trait and never talks to a node directly. `RpcLedger` reads a
//! live chain over JSON-RPC; `InMemoryLedger` holds pools in process and
//! quotes them with the exact AMM math.
//!
//! A scanner operation runs against [`Ledger::snapshot`], so every read of
//! one call sees the same state.
//!
//! `Ok(None)` from a state read means no contract is deployed at the
//! address (or it does not answer the pool interface). Transport failures
//! are errors.

mod memory;
mod rpc;

pub use memory::InMemoryLedger;
pub use rpc::RpcLedger;

use std::sync::Arc;

use async_trait::async_trait;
use dex::{Address, DexError, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid RPC endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("Ledger request failed: {reason}")]
    Transport { reason: String },

    #[error("Undecodable ledger response: {0}")]
    Decode(#[from] DexError),

    #[error("Unexpected response from {address:?}: {reason}")]
    InvalidResponse { address: Address, reason: String },
}

/// Constant-product pair reserves with the pair's own token order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairState {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
}

/// Concentrated-liquidity pool price slot and active liquidity. Algebra
/// pools report their current dynamic fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedPoolState {
    pub token0: Address,
    pub token1: Address,
    /// Fee in pips
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
}

/// Read pool state and simulate swaps against one ledger snapshot
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Ledger fixed at the current state, shared by every read of one
    /// scanner operation
    async fn snapshot(&self) -> Result<Arc<dyn Ledger>, LedgerError>;

    async fn pair_state(&self, pair: Address) -> Result<Option<PairState>, LedgerError>;

    /// Uniswap V3 pool, from `slot0()`, `fee()` and `liquidity()`
    async fn concentrated_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError>;

    /// Algebra pool, from `globalState()` and `liquidity()`
    async fn algebra_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError>;

    /// Exact-input quote from a concentrated-liquidity quoter contract
    ///
    /// Returns zero when the quoter reverts (no pool for the tokens and fee,
    /// or the pool cannot fill the trade).
    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, LedgerError>;

    /// Exact-input quote from an Algebra quoter, which finds the pool from
    /// the pair alone. Zero when the quoter reverts.
    async fn quote_algebra_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<U256, LedgerError>;

    /// ERC-20 `decimals()`
    async fn token_decimals(&self, token: Address) -> Result<u8, LedgerError>;

    /// Number of pairs a constant-product factory has created
    async fn all_pairs_length(&self, factory: Address) -> Result<u64, LedgerError>;

    /// Pair created at `index` by a constant-product factory
    async fn pair_at(&self, factory: Address, index: u64) -> Result<Address, LedgerError>;
}
