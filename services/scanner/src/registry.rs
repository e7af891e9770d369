//! Dex registry
//!
//! Immutable table of the dexes the scanner can quote, keyed by dex id.
//! Built once and shared by `Arc`; registering another dex means building a
//! new registry.

use std::collections::BTreeMap;

use amm::v2_math::BPS_DENOMINATOR;
use dex::{Address, DexProtocol, H256, MAX_FEE};
use scanner_config::{DexSettings, ScannerConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScannerError};

/// One registered dex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexConfig {
    pub dex_id: u8,
    pub protocol: DexProtocol,
    pub factory: Address,
    pub router: Address,
    /// Zero for constant-product dexes
    pub quoter: Address,
    /// CREATE2 deployer of the pools. The factory itself except for Algebra,
    /// which deploys through a separate pool deployer.
    pub pool_deployer: Address,
    /// Constant product: the single pair fee in bps.
    /// Concentrated liquidity: pool-selecting tiers in pips, in search order.
    /// Algebra: unused, pools charge a dynamic fee.
    pub fee_tiers: Vec<u32>,
    /// Init code hash of the factory's pools
    pub init_code_hash: H256,
}

/// Encoded fee of a market whose pool is selected by the pair alone
const PAIR_MARKET: &[u32] = &[0];

impl DexConfig {
    pub fn new(
        dex_id: u8,
        protocol: DexProtocol,
        factory: Address,
        router: Address,
        quoter: Address,
        fee_tiers: Vec<u32>,
    ) -> Self {
        Self {
            dex_id,
            protocol,
            factory,
            router,
            quoter,
            pool_deployer: factory,
            fee_tiers,
            init_code_hash: protocol.default_init_code_hash(),
        }
    }

    pub fn with_pool_deployer(mut self, pool_deployer: Address) -> Self {
        self.pool_deployer = pool_deployer;
        self
    }

    /// Forks deploy a different pool bytecode than the family's canonical one
    pub fn with_pool_init_code_hash(mut self, init_code_hash: H256) -> Self {
        self.init_code_hash = init_code_hash;
        self
    }

    /// Fee a constant-product pair charges
    pub fn implicit_fee(&self) -> Option<u32> {
        match self.protocol {
            DexProtocol::ConstantProduct => self.fee_tiers.first().copied(),
            DexProtocol::ConcentratedLiquidity | DexProtocol::Algebra => None,
        }
    }

    /// Resolves an encoded fee to the fee the located pool is priced with
    ///
    /// Only concentrated-liquidity fees select a pool. Constant-product pairs
    /// always charge the registered pair fee and Algebra pools report their
    /// own fee (0 here, read from pool state when needed), so any encoded
    /// fee is accepted for those.
    pub fn effective_fee(&self, encoded_fee: u32) -> Result<u32> {
        if !self.protocol.fee_selects_pool() {
            return Ok(self.implicit_fee().unwrap_or(0));
        }
        if self.fee_tiers.contains(&encoded_fee) {
            Ok(encoded_fee)
        } else {
            Err(ScannerError::UnknownFeeTier {
                dex_id: self.dex_id,
                fee: encoded_fee,
            })
        }
    }

    /// Encoded fees that select this dex's markets for a token pair
    pub fn market_fees(&self) -> &[u32] {
        match self.protocol {
            DexProtocol::ConstantProduct => &self.fee_tiers[..self.fee_tiers.len().min(1)],
            DexProtocol::ConcentratedLiquidity => &self.fee_tiers,
            DexProtocol::Algebra => PAIR_MARKET,
        }
    }

    fn validate(&self) -> Result<()> {
        match self.protocol {
            DexProtocol::ConstantProduct => {
                if self.fee_tiers.len() != 1 {
                    return Err(ScannerError::configuration(format!(
                        "constant-product dex {} needs exactly one fee, got {:?}",
                        self.dex_id, self.fee_tiers
                    )));
                }
                if self.fee_tiers[0] > BPS_DENOMINATOR {
                    return Err(ScannerError::configuration(format!(
                        "dex {} fee {} exceeds {} bps",
                        self.dex_id, self.fee_tiers[0], BPS_DENOMINATOR
                    )));
                }
            }
            DexProtocol::Algebra => {}
            DexProtocol::ConcentratedLiquidity => {
                if self.fee_tiers.is_empty() {
                    return Err(ScannerError::configuration(format!(
                        "concentrated-liquidity dex {} has no fee tiers",
                        self.dex_id
                    )));
                }
                if let Some(fee) = self.fee_tiers.iter().find(|&&fee| fee > MAX_FEE) {
                    return Err(ScannerError::configuration(format!(
                        "dex {} fee tier {} does not fit an encoded exchange",
                        self.dex_id, fee
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DexRegistry {
    dexes: BTreeMap<u8, DexConfig>,
}

impl DexRegistry {
    /// Builds the registry from parallel arrays, one entry per dex
    pub fn initialize(
        dex_ids: &[u8],
        protocols: &[DexProtocol],
        factories: &[Address],
        routers: &[Address],
        quoters: &[Address],
        fee_tiers_per_dex: &[Vec<u32>],
    ) -> Result<Self> {
        let len = dex_ids.len();
        let lengths = [
            ("protocols", protocols.len()),
            ("factories", factories.len()),
            ("routers", routers.len()),
            ("quoters", quoters.len()),
            ("fee tiers", fee_tiers_per_dex.len()),
        ];
        if let Some((field, actual)) = lengths.iter().find(|(_, actual)| *actual != len) {
            return Err(ScannerError::configuration(format!(
                "{field} has {actual} entries for {len} dex ids"
            )));
        }

        let configs = (0..len).map(|i| {
            DexConfig::new(
                dex_ids[i],
                protocols[i],
                factories[i],
                routers[i],
                quoters[i],
                fee_tiers_per_dex[i].clone(),
            )
        });
        Self::from_configs(configs)
    }

    pub fn from_configs(configs: impl IntoIterator<Item = DexConfig>) -> Result<Self> {
        let mut dexes = BTreeMap::new();
        for config in configs {
            config.validate()?;
            let dex_id = config.dex_id;
            if dexes.insert(dex_id, config).is_some() {
                return Err(ScannerError::configuration(format!(
                    "duplicate dex id {dex_id}"
                )));
            }
        }
        Ok(Self { dexes })
    }

    /// Registry described by the `[[dexes]]` configuration table
    pub fn from_scanner_config(config: &ScannerConfig) -> Result<Self> {
        let configs = config
            .dexes
            .iter()
            .map(dex_config_from_settings)
            .collect::<Result<Vec<_>>>()?;
        Self::from_configs(configs)
    }

    pub fn lookup(&self, dex_id: u8) -> Result<&DexConfig> {
        self.dexes
            .get(&dex_id)
            .ok_or(ScannerError::UnknownDex { dex_id })
    }

    /// Registered dexes in dex id order
    pub fn iter(&self) -> impl Iterator<Item = &DexConfig> {
        self.dexes.values()
    }

    pub fn len(&self) -> usize {
        self.dexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dexes.is_empty()
    }
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|e| ScannerError::configuration(format!("invalid {field} address {value:?}: {e}")))
}

fn dex_config_from_settings(settings: &DexSettings) -> Result<DexConfig> {
    let context = |field: &str| format!("dex {} {}", settings.dex_id, field);
    let mut config = DexConfig::new(
        settings.dex_id,
        settings.protocol,
        parse_address(&context("factory"), &settings.factory)?,
        parse_address(&context("router"), &settings.router)?,
        parse_address(&context("quoter"), &settings.quoter)?,
        settings.fee_tiers.clone(),
    );
    if let Some(deployer) = &settings.pool_deployer {
        config = config.with_pool_deployer(parse_address(&context("pool deployer"), deployer)?);
    }
    match &settings.init_code_hash {
        Some(hash) => {
            let hash: H256 = hash.parse().map_err(|e| {
                ScannerError::configuration(format!(
                    "invalid init code hash for dex {}: {e}",
                    settings.dex_id
                ))
            })?;
            Ok(config.with_pool_init_code_hash(hash))
        }
        None => Ok(config),
    }
}
