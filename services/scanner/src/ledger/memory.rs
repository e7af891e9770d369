//! In-process ledger
//!
//! Pools live at their CREATE2 addresses, so the scanner locates them
//! exactly as it would on chain. Quoters are registered against a pool
//! deployer and quote by running the tick-walking swap from `amm`.

use std::collections::HashMap;
use std::sync::Arc;

use amm::{AmmPool, V3PoolState, V3Swap};
use async_trait::async_trait;
use dex::{
    algebra_pool_address, concentrated_pool_address, constant_product_pair_address, sort_tokens,
    Address, DexProtocol, H256, U256,
};
use parking_lot::RwLock;
use tracing::debug;

use super::{ConcentratedPoolState, Ledger, LedgerError, PairState};

#[derive(Debug, Clone)]
struct ConcentratedPool {
    token0: Address,
    token1: Address,
    state: V3PoolState,
}

#[derive(Debug, Clone, Copy)]
struct QuoterDeployment {
    protocol: DexProtocol,
    deployer: Address,
    init_code_hash: H256,
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    pairs: HashMap<Address, PairState>,
    pools: HashMap<Address, ConcentratedPool>,
    /// Pairs in factory creation order
    factory_pairs: HashMap<Address, Vec<Address>>,
    quoters: HashMap<Address, QuoterDeployment>,
    decimals: HashMap<Address, u8>,
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_decimals(&self, token: Address, decimals: u8) {
        self.state.write().decimals.insert(token, decimals);
    }

    /// Creates (or re-funds) the pair of `token_a`/`token_b` under `factory`
    pub fn deploy_pair(
        &self,
        factory: Address,
        init_code_hash: H256,
        token_a: Address,
        token_b: Address,
        reserve_a: U256,
        reserve_b: U256,
    ) -> Address {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let (reserve0, reserve1) = if token0 == token_a {
            (reserve_a, reserve_b)
        } else {
            (reserve_b, reserve_a)
        };
        let pair = constant_product_pair_address(factory, token0, token1, init_code_hash);

        let mut state = self.state.write();
        let created = state
            .pairs
            .insert(
                pair,
                PairState {
                    token0,
                    token1,
                    reserve0,
                    reserve1,
                },
            )
            .is_none();
        let index = state.factory_pairs.entry(factory).or_default();
        if created {
            index.push(pair);
        }
        pair
    }

    /// Creates the concentrated-liquidity pool of `pool.fee_pips` for the pair
    pub fn deploy_concentrated_pool(
        &self,
        factory: Address,
        init_code_hash: H256,
        token_a: Address,
        token_b: Address,
        pool: V3PoolState,
    ) -> Address {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let address =
            concentrated_pool_address(factory, token0, token1, pool.fee_pips, init_code_hash);
        self.insert_pool(address, token0, token1, pool)
    }

    /// Creates the Algebra pool of the pair; `pool.fee_pips` is its current
    /// dynamic fee
    pub fn deploy_algebra_pool(
        &self,
        pool_deployer: Address,
        init_code_hash: H256,
        token_a: Address,
        token_b: Address,
        pool: V3PoolState,
    ) -> Address {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let address = algebra_pool_address(pool_deployer, token0, token1, init_code_hash);
        self.insert_pool(address, token0, token1, pool)
    }

    fn insert_pool(
        &self,
        address: Address,
        token0: Address,
        token1: Address,
        state: V3PoolState,
    ) -> Address {
        self.state.write().pools.insert(
            address,
            ConcentratedPool {
                token0,
                token1,
                state,
            },
        );
        address
    }

    /// Uniswap V3 quoter answering for pools of `factory`
    pub fn register_quoter(&self, quoter: Address, factory: Address, init_code_hash: H256) {
        self.register(quoter, DexProtocol::ConcentratedLiquidity, factory, init_code_hash);
    }

    /// Algebra quoter answering for pools of `pool_deployer`
    pub fn register_algebra_quoter(
        &self,
        quoter: Address,
        pool_deployer: Address,
        init_code_hash: H256,
    ) {
        self.register(quoter, DexProtocol::Algebra, pool_deployer, init_code_hash);
    }

    fn register(&self, quoter: Address, protocol: DexProtocol, deployer: Address, init_code_hash: H256) {
        self.state.write().quoters.insert(
            quoter,
            QuoterDeployment {
                protocol,
                deployer,
                init_code_hash,
            },
        );
    }

    /// Registers a factory with no pairs yet
    pub fn register_factory(&self, factory: Address) {
        self.state.write().factory_pairs.entry(factory).or_default();
    }
}

impl LedgerState {
    /// Pool a quoter of `protocol` resolves for the pair, if deployed
    fn quoted_pool(
        &self,
        quoter: Address,
        protocol: DexProtocol,
        token_in: Address,
        token_out: Address,
        fee: u32,
    ) -> Option<(Address, &ConcentratedPool)> {
        let deployment = self.quoters.get(&quoter).filter(|d| d.protocol == protocol)?;
        let address = match protocol {
            DexProtocol::Algebra => algebra_pool_address(
                deployment.deployer,
                token_in,
                token_out,
                deployment.init_code_hash,
            ),
            _ => concentrated_pool_address(
                deployment.deployer,
                token_in,
                token_out,
                fee,
                deployment.init_code_hash,
            ),
        };
        self.pools.get(&address).map(|pool| (address, pool))
    }

    fn pool_state(&self, pool: Address) -> Option<ConcentratedPoolState> {
        self.pools.get(&pool).map(|pool| ConcentratedPoolState {
            token0: pool.token0,
            token1: pool.token1,
            fee: pool.state.fee_pips,
            sqrt_price_x96: pool.state.sqrt_price_x96,
            tick: pool.state.tick,
            liquidity: pool.state.liquidity,
        })
    }
}

/// Runs the swap a quoter would simulate; a failed swap reverts to zero
fn quote_swap(address: Address, pool: &ConcentratedPool, token_in: Address, amount_in: U256) -> U256 {
    let swap = V3Swap {
        pool: &pool.state,
        zero_for_one: token_in == pool.token0,
    };
    match swap.amount_out(amount_in) {
        Ok(amount_out) => amount_out,
        Err(err) => {
            debug!("Quote through {:?} reverted: {}", address, err);
            U256::zero()
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    /// Copy of the current state; later deployments do not show through
    async fn snapshot(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        Ok(Arc::new(InMemoryLedger {
            state: RwLock::new(self.state.read().clone()),
        }))
    }

    async fn pair_state(&self, pair: Address) -> Result<Option<PairState>, LedgerError> {
        Ok(self.state.read().pairs.get(&pair).copied())
    }

    async fn concentrated_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError> {
        Ok(self.state.read().pool_state(pool))
    }

    async fn algebra_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError> {
        Ok(self.state.read().pool_state(pool))
    }

    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, LedgerError> {
        let state = self.state.read();
        Ok(state
            .quoted_pool(quoter, DexProtocol::ConcentratedLiquidity, token_in, token_out, fee)
            .map_or_else(U256::zero, |(address, pool)| {
                quote_swap(address, pool, token_in, amount_in)
            }))
    }

    async fn quote_algebra_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<U256, LedgerError> {
        let state = self.state.read();
        Ok(state
            .quoted_pool(quoter, DexProtocol::Algebra, token_in, token_out, 0)
            .map_or_else(U256::zero, |(address, pool)| {
                quote_swap(address, pool, token_in, amount_in)
            }))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, LedgerError> {
        self.state
            .read()
            .decimals
            .get(&token)
            .copied()
            .ok_or_else(|| LedgerError::InvalidResponse {
                address: token,
                reason: "decimals() reverted".to_string(),
            })
    }

    async fn all_pairs_length(&self, factory: Address) -> Result<u64, LedgerError> {
        self.state
            .read()
            .factory_pairs
            .get(&factory)
            .map(|pairs| pairs.len() as u64)
            .ok_or_else(|| LedgerError::InvalidResponse {
                address: factory,
                reason: "allPairsLength() reverted".to_string(),
            })
    }

    async fn pair_at(&self, factory: Address, index: u64) -> Result<Address, LedgerError> {
        let state = self.state.read();
        usize::try_from(index)
            .ok()
            .and_then(|index| state.factory_pairs.get(&factory)?.get(index).copied())
            .ok_or_else(|| LedgerError::InvalidResponse {
                address: factory,
                reason: format!("allPairs({index}) reverted"),
            })
    }
}
