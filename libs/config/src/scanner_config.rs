//! Scanner Configuration Module
//!
//! Loads the dex table, RPC endpoint and validation references from TOML
//! files with environment-specific overrides.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use dex::DexProtocol;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::polygon;

/// Main scanner configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScannerConfig {
    /// Ledger access
    pub rpc: RpcSettings,

    /// Registered dexes, one entry per dex id
    pub dexes: Vec<DexSettings>,

    /// Reference liquidity used by token validation
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RpcSettings {
    /// HTTP endpoint, `${VAR}` references are expanded
    pub url: String,

    /// Chain ID (137 for Polygon)
    pub chain_id: u64,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Block to pin reads to; latest when absent
    #[serde(default)]
    pub block: Option<u64>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// One dex of the registry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DexSettings {
    pub dex_id: u8,
    pub name: String,
    pub protocol: DexProtocol,
    pub factory: String,
    pub router: String,
    #[serde(default = "zero_address")]
    pub quoter: String,
    /// CREATE2 deployer of the pools; the factory when absent
    #[serde(default)]
    pub pool_deployer: Option<String>,
    /// Bps for constant-product (exactly one), pips for concentrated
    /// liquidity, unused by Algebra pools
    #[serde(default)]
    pub fee_tiers: Vec<u32>,
    /// Overrides the protocol family's default init code hash
    #[serde(default)]
    pub init_code_hash: Option<String>,
}

fn zero_address() -> String {
    polygon::ZERO_ADDRESS.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ValidationSettings {
    #[serde(default)]
    pub reference_tokens: Vec<ReferenceTokenSettings>,
}

/// Reference token requirement; `amount` is in whole token units
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReferenceTokenSettings {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
    pub amount: String,
    pub max_slippage_bps: u32,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: polygon::DEFAULT_RPC_URL.to_string(),
            chain_id: polygon::CHAIN_ID,
            timeout_ms: default_timeout_ms(),
            block: None,
        }
    }
}

impl Default for ScannerConfig {
    /// Polygon deployment: QuickSwap V2, QuickSwap V3, Uniswap V3, SushiSwap V2
    fn default() -> Self {
        use polygon::{dex_ids, quickswap_v2, quickswap_v3, sushiswap_v2, uniswap_v3};

        Self {
            rpc: RpcSettings::default(),
            dexes: vec![
                DexSettings {
                    dex_id: dex_ids::QUICKSWAP_V2,
                    name: "quickswap_v2".to_string(),
                    protocol: DexProtocol::ConstantProduct,
                    factory: quickswap_v2::FACTORY.to_string(),
                    router: quickswap_v2::ROUTER.to_string(),
                    quoter: zero_address(),
                    pool_deployer: None,
                    fee_tiers: vec![quickswap_v2::FEE_BPS],
                    init_code_hash: None,
                },
                DexSettings {
                    dex_id: dex_ids::QUICKSWAP_V3,
                    name: "quickswap_v3".to_string(),
                    protocol: DexProtocol::Algebra,
                    factory: quickswap_v3::FACTORY.to_string(),
                    router: quickswap_v3::ROUTER.to_string(),
                    quoter: quickswap_v3::QUOTER.to_string(),
                    pool_deployer: Some(quickswap_v3::POOL_DEPLOYER.to_string()),
                    fee_tiers: Vec::new(),
                    init_code_hash: None,
                },
                DexSettings {
                    dex_id: dex_ids::UNISWAP_V3,
                    name: "uniswap_v3".to_string(),
                    protocol: DexProtocol::ConcentratedLiquidity,
                    factory: uniswap_v3::FACTORY.to_string(),
                    router: uniswap_v3::ROUTER.to_string(),
                    quoter: uniswap_v3::QUOTER.to_string(),
                    pool_deployer: None,
                    fee_tiers: uniswap_v3::FEE_TIERS.to_vec(),
                    init_code_hash: None,
                },
                DexSettings {
                    dex_id: dex_ids::SUSHISWAP_V2,
                    name: "sushiswap_v2".to_string(),
                    protocol: DexProtocol::ConstantProduct,
                    factory: sushiswap_v2::FACTORY.to_string(),
                    router: sushiswap_v2::ROUTER.to_string(),
                    quoter: zero_address(),
                    pool_deployer: None,
                    fee_tiers: vec![sushiswap_v2::FEE_BPS],
                    init_code_hash: Some(sushiswap_v2::INIT_CODE_HASH.to_string()),
                },
            ],
            validation: ValidationSettings {
                reference_tokens: polygon::REFERENCE_PAIRS
                    .iter()
                    .map(|pair| ReferenceTokenSettings {
                        symbol: pair.symbol.to_string(),
                        address: pair.address.to_string(),
                        decimals: pair.decimals,
                        amount: pair.amount.to_string(),
                        max_slippage_bps: pair.max_slippage_bps,
                    })
                    .collect(),
            },
        }
    }
}

impl ScannerConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new("config/scanner.toml"));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .unwrap_or(Path::new("."))
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (SCANNER_RPC__URL, ...)
        builder = builder.add_source(
            Environment::with_prefix("SCANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Expand environment variables in string values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let expanded = shellexpand::env(&self.rpc.url).context("Failed to expand RPC URL")?;
        self.rpc.url = expanded.to_string();
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.rpc.url.trim().is_empty() {
            bail!("rpc.url must not be empty");
        }
        if self.rpc.timeout_ms == 0 {
            bail!("rpc.timeout_ms must be positive");
        }
        if self.dexes.is_empty() {
            bail!("at least one dex must be configured");
        }

        let mut seen = HashSet::new();
        for dex in &self.dexes {
            if !seen.insert(dex.dex_id) {
                bail!("duplicate dex_id {}", dex.dex_id);
            }
            if dex.fee_tiers.is_empty() && dex.protocol != DexProtocol::Algebra {
                bail!("dex {} ({}) has no fee tiers", dex.dex_id, dex.name);
            }
            if dex.protocol == DexProtocol::ConstantProduct && dex.fee_tiers.len() != 1 {
                bail!(
                    "constant-product dex {} ({}) must have exactly one fee, got {:?}",
                    dex.dex_id,
                    dex.name,
                    dex.fee_tiers
                );
            }
            if dex.protocol == DexProtocol::ConstantProduct && dex.fee_tiers[0] > 10_000 {
                bail!("dex {} fee {} exceeds 10000 bps", dex.dex_id, dex.fee_tiers[0]);
            }
        }

        for reference in &self.validation.reference_tokens {
            if reference.max_slippage_bps > 10_000 {
                bail!(
                    "max_slippage_bps for {} must be <= 10000 (100%)",
                    reference.symbol
                );
            }
            if reference.amount.trim().is_empty() {
                bail!("reference amount for {} must not be empty", reference.symbol);
            }
        }

        Ok(())
    }

    pub fn dex(&self, dex_id: u8) -> Option<&DexSettings> {
        self.dexes.iter().find(|dex| dex.dex_id == dex_id)
    }
}

/// Convenience function to load, expand and validate configuration
pub fn load_config(path: Option<PathBuf>, environment: Option<&str>) -> Result<ScannerConfig> {
    let mut config = ScannerConfig::load(path.as_deref(), environment)?;
    config.expand_env_vars()?;
    config.validate()?;
    Ok(config)
}
