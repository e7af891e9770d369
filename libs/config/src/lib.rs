//! # Scanner Configuration
//!
//! Configuration loading and deployment constants for the arbitrage scanner.
//!
//! ## Features
//!
//! - **Polygon Constants**: Factory, router and quoter addresses, token
//!   addresses, reference liquidity requirements
//! - **Scanner Configuration**: TOML files with environment overlays and
//!   `SCANNER_*` variable overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scanner_config::{load_config, polygon};
//!
//! let config = load_config(None, Some("production"))?;
//! assert_eq!(config.rpc.chain_id, polygon::CHAIN_ID);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod polygon;
pub mod scanner_config;

// Re-export commonly used types
pub use scanner_config::{
    load_config, DexSettings, ReferenceTokenSettings, RpcSettings, ScannerConfig,
    ValidationSettings,
};

/// Render a configuration as TOML, e.g. to seed a config file from defaults
pub fn to_toml(config: &ScannerConfig) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
