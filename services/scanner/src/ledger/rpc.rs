//! JSON-RPC ledger over an ethers HTTP provider
//!
//! Every read is an `eth_call` against one block. An unpinned ledger reads
//! `latest`, which may move between calls, so its [`Ledger::snapshot`] pins
//! the current head with [`RpcLedger::pin_latest`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dex::abi::calls::{self, ALL_PAIRS, ALL_PAIRS_LENGTH, DECIMALS, FEE, GET_RESERVES,
    GLOBAL_STATE, LIQUIDITY, QUOTE_EXACT_INPUT_SINGLE, SLOT0, TOKEN0, TOKEN1};
use ethers::prelude::*;
use ethers::providers::{Http, RpcError};
use ethers::types::transaction::eip2718::TypedTransaction;
use scanner_config::RpcSettings;
use tracing::{debug, trace};
use url::Url;

use super::{ConcentratedPoolState, Ledger, LedgerError, PairState};

/// JSON-RPC error code for execution reverted
const EXECUTION_REVERTED: i64 = 3;

#[derive(Debug, Clone)]
pub struct RpcLedger {
    provider: Arc<Provider<Http>>,
    block: Option<BlockId>,
}

impl RpcLedger {
    /// Connect to `rpc_url`; every request times out after `timeout`
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| LedgerError::Endpoint {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?;

        let url: Url = rpc_url.parse().map_err(|e: url::ParseError| LedgerError::Endpoint {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        let provider = Provider::new(Http::new_with_client(url, client));

        crate::log_network!("RPC ledger at {} (timeout {}ms)", rpc_url, timeout.as_millis());
        Ok(Self {
            provider: Arc::new(provider),
            block: None,
        })
    }

    /// Ledger described by the `[rpc]` configuration section
    pub fn from_settings(settings: &RpcSettings) -> Result<Self, LedgerError> {
        let ledger = Self::new(&settings.url, Duration::from_millis(settings.timeout_ms))?;
        Ok(match settings.block {
            Some(block) => ledger.at_block(block),
            None => ledger,
        })
    }

    /// Same connection, reading state as of `block`
    pub fn at_block(&self, block: u64) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            block: Some(BlockId::Number(BlockNumber::Number(block.into()))),
        }
    }

    /// Same connection, pinned to the current head
    pub async fn pin_latest(&self) -> Result<Self, LedgerError> {
        let head = self
            .provider
            .get_block_number()
            .await
            .map_err(transport)?;
        debug!("Pinned RPC ledger to block {}", head);
        Ok(self.at_block(head.as_u64()))
    }

    /// This ledger if already pinned, else pinned to the current head
    pub async fn pinned(&self) -> Result<Self, LedgerError> {
        match self.block {
            Some(_) => Ok(self.clone()),
            None => self.pin_latest().await,
        }
    }

    /// Pinned block, `None` when reading `latest`
    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    /// `eth_call`, `None` when execution reverts
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Option<Bytes>, LedgerError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        match self.provider.call(&tx, self.block).await {
            Ok(output) => Ok(Some(output)),
            Err(err) if is_revert(&err) => {
                trace!("eth_call to {:?} reverted: {}", to, err);
                Ok(None)
            }
            Err(err) => {
                crate::log_error!("eth_call to {:?} failed: {}", to, err);
                Err(transport(err))
            }
        }
    }

    /// Call that must succeed for a deployed contract
    async fn call_required(
        &self,
        to: Address,
        data: Vec<u8>,
        what: &str,
    ) -> Result<Bytes, LedgerError> {
        self.call(to, data)
            .await?
            .ok_or_else(|| LedgerError::InvalidResponse {
                address: to,
                reason: format!("{what} reverted"),
            })
    }

    async fn is_deployed(&self, address: Address) -> Result<bool, LedgerError> {
        let code = self
            .provider
            .get_code(address, self.block)
            .await
            .map_err(transport)?;
        Ok(!code.is_empty())
    }
}

fn transport(err: ProviderError) -> LedgerError {
    LedgerError::Transport {
        reason: err.to_string(),
    }
}

fn is_revert(err: &ProviderError) -> bool {
    RpcError::as_error_response(err)
        .map(|response| {
            response.code == EXECUTION_REVERTED || response.message.contains("revert")
        })
        .unwrap_or(false)
}

fn to_u128(address: Address, value: U256) -> Result<u128, LedgerError> {
    if value > U256::from(u128::MAX) {
        return Err(LedgerError::InvalidResponse {
            address,
            reason: format!("{value} does not fit u128"),
        });
    }
    Ok(value.as_u128())
}

fn to_u64(address: Address, value: U256) -> Result<u64, LedgerError> {
    if value > U256::from(u64::MAX) {
        return Err(LedgerError::InvalidResponse {
            address,
            reason: format!("{value} does not fit u64"),
        });
    }
    Ok(value.as_u64())
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn snapshot(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        Ok(Arc::new(self.pinned().await?))
    }

    async fn pair_state(&self, pair: Address) -> Result<Option<PairState>, LedgerError> {
        if !self.is_deployed(pair).await? {
            return Ok(None);
        }

        let (token0, token1, reserves) = tokio::try_join!(
            self.call(pair, calls::encode_call(&TOKEN0)?),
            self.call(pair, calls::encode_call(&TOKEN1)?),
            self.call(pair, calls::encode_call(&GET_RESERVES)?),
        )?;
        // Deployed but not a pair
        let (Some(token0), Some(token1), Some(reserves)) = (token0, token1, reserves) else {
            return Ok(None);
        };

        let reserves = calls::decode_reserves(&reserves)?;
        Ok(Some(PairState {
            token0: calls::decode_address(&TOKEN0, &token0)?,
            token1: calls::decode_address(&TOKEN1, &token1)?,
            reserve0: reserves.reserve0,
            reserve1: reserves.reserve1,
        }))
    }

    async fn concentrated_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError> {
        if !self.is_deployed(pool).await? {
            return Ok(None);
        }

        let (token0, token1, fee, slot0, liquidity) = tokio::try_join!(
            self.call(pool, calls::encode_call(&TOKEN0)?),
            self.call(pool, calls::encode_call(&TOKEN1)?),
            self.call(pool, calls::encode_call(&FEE)?),
            self.call(pool, calls::encode_call(&SLOT0)?),
            self.call(pool, calls::encode_call(&LIQUIDITY)?),
        )?;
        let (Some(token0), Some(token1), Some(fee), Some(slot0), Some(liquidity)) =
            (token0, token1, fee, slot0, liquidity)
        else {
            return Ok(None);
        };

        let slot0 = calls::decode_slot0(&slot0)?;
        Ok(Some(ConcentratedPoolState {
            token0: calls::decode_address(&TOKEN0, &token0)?,
            token1: calls::decode_address(&TOKEN1, &token1)?,
            fee: calls::decode_uint(&FEE, &fee)?.low_u32(),
            sqrt_price_x96: slot0.sqrt_price_x96,
            tick: slot0.tick,
            liquidity: to_u128(pool, calls::decode_uint(&LIQUIDITY, &liquidity)?)?,
        }))
    }

    async fn algebra_pool_state(
        &self,
        pool: Address,
    ) -> Result<Option<ConcentratedPoolState>, LedgerError> {
        if !self.is_deployed(pool).await? {
            return Ok(None);
        }

        let (token0, token1, global_state, liquidity) = tokio::try_join!(
            self.call(pool, calls::encode_call(&TOKEN0)?),
            self.call(pool, calls::encode_call(&TOKEN1)?),
            self.call(pool, calls::encode_call(&GLOBAL_STATE)?),
            self.call(pool, calls::encode_call(&LIQUIDITY)?),
        )?;
        let (Some(token0), Some(token1), Some(global_state), Some(liquidity)) =
            (token0, token1, global_state, liquidity)
        else {
            return Ok(None);
        };

        let global_state = calls::decode_global_state(&global_state)?;
        Ok(Some(ConcentratedPoolState {
            token0: calls::decode_address(&TOKEN0, &token0)?,
            token1: calls::decode_address(&TOKEN1, &token1)?,
            fee: global_state.fee,
            sqrt_price_x96: global_state.sqrt_price_x96,
            tick: global_state.tick,
            liquidity: to_u128(pool, calls::decode_uint(&LIQUIDITY, &liquidity)?)?,
        }))
    }

    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, LedgerError> {
        let calldata = calls::encode_quote_exact_input_single(token_in, token_out, fee, amount_in)?;
        match self.call(quoter, calldata).await? {
            Some(output) => Ok(calls::decode_uint(&QUOTE_EXACT_INPUT_SINGLE, &output)?),
            None => Ok(U256::zero()),
        }
    }

    async fn quote_algebra_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<U256, LedgerError> {
        let calldata = calls::encode_algebra_quote_exact_input_single(token_in, token_out, amount_in)?;
        match self.call(quoter, calldata).await? {
            Some(output) => Ok(calls::decode_algebra_quote(&output)?),
            None => Ok(U256::zero()),
        }
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, LedgerError> {
        let output = self
            .call_required(token, calls::encode_call(&DECIMALS)?, "decimals()")
            .await?;
        Ok(calls::decode_decimals(&output)?)
    }

    async fn all_pairs_length(&self, factory: Address) -> Result<u64, LedgerError> {
        let output = self
            .call_required(factory, calls::encode_call(&ALL_PAIRS_LENGTH)?, "allPairsLength()")
            .await?;
        to_u64(factory, calls::decode_uint(&ALL_PAIRS_LENGTH, &output)?)
    }

    async fn pair_at(&self, factory: Address, index: u64) -> Result<Address, LedgerError> {
        let output = self
            .call_required(factory, calls::encode_all_pairs(index)?, "allPairs()")
            .await?;
        Ok(calls::decode_address(&ALL_PAIRS, &output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_url() {
        let err = RpcLedger::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Endpoint { .. }));
    }

    #[test]
    fn test_pinning_shares_the_provider() {
        let ledger = RpcLedger::new("http://localhost:8545", Duration::from_secs(1)).unwrap();
        assert!(ledger.block().is_none());

        let pinned = ledger.at_block(50_000_000);
        assert!(Arc::ptr_eq(&ledger.provider, &pinned.provider));
        assert_eq!(
            pinned.block(),
            Some(BlockId::Number(BlockNumber::Number(50_000_000u64.into())))
        );
    }

    #[test]
    fn test_settings_block_pins_ledger() {
        let settings = RpcSettings {
            url: "http://localhost:8545".to_string(),
            chain_id: 137,
            timeout_ms: 500,
            block: Some(42),
        };
        let ledger = RpcLedger::from_settings(&settings).unwrap();
        assert!(ledger.block().is_some());
    }

    #[tokio::test]
    async fn test_pinned_ledger_keeps_its_block() {
        // Nothing listens here, so asking for the head would fail
        let ledger = RpcLedger::new("http://127.0.0.1:9", Duration::from_millis(200))
            .unwrap()
            .at_block(50_000_000);
        let pinned = ledger.pinned().await.unwrap();
        assert_eq!(pinned.block(), ledger.block());
        assert!(Arc::ptr_eq(&ledger.provider, &pinned.provider));
        assert!(ledger.snapshot().await.is_ok());
    }

    #[tokio::test]
    async fn test_unpinned_snapshot_resolves_the_head() {
        let ledger = RpcLedger::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let err = ledger.snapshot().await.err().unwrap();
        assert!(matches!(err, LedgerError::Transport { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires network access to a Polygon RPC endpoint
    async fn test_live_quickswap_factory() {
        let ledger = RpcLedger::new(scanner_config::polygon::DEFAULT_RPC_URL, Duration::from_secs(10))
            .unwrap()
            .pin_latest()
            .await
            .unwrap();
        let factory: Address = scanner_config::polygon::quickswap_v2::FACTORY.parse().unwrap();

        let count = ledger.all_pairs_length(factory).await.unwrap();
        assert!(count > 0);

        let pair = ledger.pair_at(factory, 0).await.unwrap();
        let state = ledger.pair_state(pair).await.unwrap().expect("pair deployed");
        assert!(state.token0 < state.token1);
    }
}
