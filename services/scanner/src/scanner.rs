//! Scanner facade
//!
//! One handle over the registry, a ledger and every query component.
//! Cloning is cheap; the registry and ledger are shared. Each query runs on
//! a fresh [`Ledger::snapshot`], so all of its reads see one ledger state.

use std::sync::Arc;

use dex::{Address, DexProtocol, EncodedExchange, U256};
use ethers::utils::parse_units;
use scanner_config::{ReferenceTokenSettings, ScannerConfig};

use crate::enumerator::{PairEnumerator, PairsAndTokens};
use crate::error::{Result, ScannerError};
use crate::exchange_rate::{BidirectionalRates, ExchangeQuote, ExchangeRateEngine};
use crate::ledger::{Ledger, RpcLedger};
use crate::locator::PoolLocator;
use crate::quoter::ProtocolQuoter;
use crate::registry::{parse_address, DexRegistry};
use crate::simulator::{TradeSimulation, TradeSimulator};
use crate::validator::{LiquidityValidator, ReferenceLiquidity};

#[derive(Clone)]
pub struct ArbitrageScanner {
    registry: Arc<DexRegistry>,
    ledger: Arc<dyn Ledger>,
    rates: ExchangeRateEngine,
    validator: LiquidityValidator,
    simulator: TradeSimulator,
    enumerator: PairEnumerator,
    references: Vec<ReferenceLiquidity>,
}

impl ArbitrageScanner {
    pub fn new(registry: Arc<DexRegistry>, ledger: Arc<dyn Ledger>) -> Self {
        let locator = PoolLocator::new(Arc::clone(&registry));
        let quoter = ProtocolQuoter::new(Arc::clone(&registry), Arc::clone(&ledger));

        Self {
            rates: ExchangeRateEngine::new(locator.clone(), quoter.clone()),
            validator: LiquidityValidator::new(locator.clone(), quoter.clone()),
            simulator: TradeSimulator::new(locator, quoter),
            enumerator: PairEnumerator::new(Arc::clone(&registry), Arc::clone(&ledger)),
            registry,
            ledger,
            references: Vec::new(),
        }
    }

    /// Registry from parallel arrays, see [`DexRegistry::initialize`]
    pub fn initialize_registry(
        dex_ids: &[u8],
        protocols: &[DexProtocol],
        factories: &[Address],
        routers: &[Address],
        quoters: &[Address],
        fee_tiers_per_dex: &[Vec<u32>],
    ) -> Result<Arc<DexRegistry>> {
        let registry = DexRegistry::initialize(
            dex_ids,
            protocols,
            factories,
            routers,
            quoters,
            fee_tiers_per_dex,
        )?;
        crate::log_success!("Registered {} dexes", registry.len());
        Ok(Arc::new(registry))
    }

    /// Scanner over the configured dexes and reference tokens
    pub fn from_config(config: &ScannerConfig, ledger: Arc<dyn Ledger>) -> Result<Self> {
        let registry = DexRegistry::from_scanner_config(config)?;
        let references = config
            .validation
            .reference_tokens
            .iter()
            .map(reference_from_settings)
            .collect::<Result<Vec<_>>>()?;

        crate::log_success!(
            "Scanner configured with {} dexes and {} reference tokens",
            registry.len(),
            references.len()
        );
        Ok(Self::new(Arc::new(registry), ledger).with_references(references))
    }

    /// Scanner reading the configured RPC endpoint
    pub fn connect(config: &ScannerConfig) -> Result<Self> {
        let ledger = RpcLedger::from_settings(&config.rpc)?;
        Self::from_config(config, Arc::new(ledger))
    }

    /// Same registry and references over another ledger
    pub fn with_ledger(&self, ledger: Arc<dyn Ledger>) -> Self {
        Self::new(Arc::clone(&self.registry), ledger).with_references(self.references.clone())
    }

    /// This scanner over a snapshot of its ledger
    pub async fn pinned(&self) -> Result<Self> {
        Ok(self.with_ledger(self.ledger.snapshot().await?))
    }

    pub fn with_references(mut self, references: Vec<ReferenceLiquidity>) -> Self {
        self.references = references;
        self
    }

    pub fn registry(&self) -> &Arc<DexRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn references(&self) -> &[ReferenceLiquidity] {
        &self.references
    }

    pub fn encode_dex_fee(dex_id: u8, fee: u32) -> Result<u32> {
        Ok(dex::encode_dex_fee(dex_id, fee)?)
    }

    pub fn decode_dex_fee(packed: u32) -> (u8, u32) {
        dex::decode_dex_fee(packed)
    }

    pub async fn get_total_pairs(&self, dex_ids: &[u8]) -> Result<Vec<u64>> {
        let pinned = self.pinned().await?;
        pinned.enumerator.total_pairs(dex_ids).await
    }

    pub async fn get_pairs_and_tokens(
        &self,
        factory: Address,
        start: u64,
        count: u64,
    ) -> Result<PairsAndTokens> {
        let pinned = self.pinned().await?;
        pinned
            .enumerator
            .get_pairs_and_tokens(factory, start, count)
            .await
    }

    pub async fn get_exchange_rate(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        exchange: EncodedExchange,
    ) -> Result<ExchangeQuote> {
        let pinned = self.pinned().await?;
        pinned
            .rates
            .get_exchange_rate(token_in, token_out, amount_in, exchange)
            .await
    }

    pub async fn get_multiple_exchange_rates_both(
        &self,
        base: Address,
        base_amount: U256,
        quotes: &[Address],
        quote_amounts: &[U256],
        exchanges: &[EncodedExchange],
    ) -> Result<BidirectionalRates> {
        let pinned = self.pinned().await?;
        pinned
            .rates
            .get_multiple_exchange_rates_both(base, base_amount, quotes, quote_amounts, exchanges)
            .await
    }

    pub async fn validate_tokens(
        &self,
        candidates: &[Address],
        dex_ids: &[u8],
        reference_tokens: &[Address],
        reference_amounts: &[U256],
        max_slippage_bps: &[u32],
    ) -> Result<Vec<Address>> {
        let pinned = self.pinned().await?;
        pinned
            .validator
            .validate_tokens(
                candidates,
                dex_ids,
                reference_tokens,
                reference_amounts,
                max_slippage_bps,
            )
            .await
    }

    /// Validates against the configured reference tokens
    pub async fn validate_with_references(
        &self,
        candidates: &[Address],
        dex_ids: &[u8],
    ) -> Result<Vec<Address>> {
        if self.references.is_empty() {
            return Err(ScannerError::configuration(
                "no reference tokens configured for validation",
            ));
        }
        let pinned = self.pinned().await?;
        pinned
            .validator
            .validate_against(candidates, dex_ids, &self.references)
            .await
    }

    pub async fn simulate_trade(
        &self,
        path: &[Address],
        exchanges: &[EncodedExchange],
        amount_in: U256,
    ) -> Result<U256> {
        let pinned = self.pinned().await?;
        pinned
            .simulator
            .simulate_trade(path, exchanges, amount_in)
            .await
    }

    pub async fn simulate_trade_detailed(
        &self,
        path: &[Address],
        exchanges: &[EncodedExchange],
        amount_in: U256,
    ) -> Result<TradeSimulation> {
        let pinned = self.pinned().await?;
        pinned
            .simulator
            .simulate_trade_detailed(path, exchanges, amount_in)
            .await
    }
}

/// Whole-unit reference amounts scaled to raw units
fn reference_from_settings(settings: &ReferenceTokenSettings) -> Result<ReferenceLiquidity> {
    let amount = parse_units(&settings.amount, u32::from(settings.decimals)).map_err(|e| {
        ScannerError::configuration(format!(
            "invalid reference amount {:?} for {}: {e}",
            settings.amount, settings.symbol
        ))
    })?;
    Ok(ReferenceLiquidity {
        token: parse_address(&settings.symbol, &settings.address)?,
        amount: amount.into(),
        max_slippage_bps: settings.max_slippage_bps,
    })
}
