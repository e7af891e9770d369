//! # Arbitrage Scanner - Multi-Dex Quoting Engine
//!
//! ## Purpose
//!
//! Aggregates prices from constant-product, concentrated-liquidity and
//! Algebra dexes behind one interface: normalized exchange rates, liquidity screening of
//! candidate tokens and atomic multi-hop trade simulation. All amount math
//! is exact `U256` arithmetic that truncates where the contracts truncate.
//!
//! ## Integration Points
//!
//! - **Registry**: [`DexRegistry`] built from parallel arrays or from
//!   [`scanner_config::ScannerConfig`]
//! - **Ledger**: [`Ledger`] trait; [`RpcLedger`] for a live chain,
//!   [`InMemoryLedger`] for offline pools
//! - **Queries**: [`ArbitrageScanner`] exposes every operation
//!
//! ## Architecture Role
//!
//! ```text
//! EncodedExchange → [PoolLocator] → pool address → [ProtocolQuoter] → amount out
//!                                                        ↓
//!                  [ExchangeRateEngine]   [LiquidityValidator]   [TradeSimulator]
//! ```
//!
//! Missing liquidity is a value, not an error: rates come back as zero with
//! the zero address, invalid candidates as the zero address. The trade
//! simulator is the exception and aborts on any dead hop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use arbitrage_scanner::{ArbitrageScanner, EncodedExchange};
//! use scanner_config::{polygon, ScannerConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = ArbitrageScanner::connect(&ScannerConfig::default())?;
//! let quote = scanner
//!     .get_exchange_rate(
//!         polygon::tokens::WBTC.parse()?,
//!         polygon::tokens::USDC.parse()?,
//!         10_000_000u64.into(),
//!         EncodedExchange::new(polygon::dex_ids::UNISWAP_V3, 500)?,
//!     )
//!     .await?;
//! println!("rate {} via {:?}", quote.rate, quote.pool);
//! # Ok(())
//! # }
//! ```

pub mod logging;

pub mod enumerator;
pub mod error;
pub mod exchange_rate;
pub mod ledger;
pub mod locator;
pub mod protocols;
pub mod quoter;
pub mod registry;
pub mod scanner;
pub mod simulator;
pub mod validator;

pub use enumerator::{PairEnumerator, PairsAndTokens};
pub use error::{Result, ScannerError};
pub use exchange_rate::{BidirectionalRates, ExchangeQuote, ExchangeRateEngine};
pub use ledger::{ConcentratedPoolState, InMemoryLedger, Ledger, LedgerError, PairState, RpcLedger};
pub use locator::{LocatedPool, PoolLocator};
pub use quoter::ProtocolQuoter;
pub use registry::{DexConfig, DexRegistry};
pub use scanner::ArbitrageScanner;
pub use simulator::{HopResult, TradeSimulation, TradeSimulator};
pub use validator::{LiquidityValidator, ReferenceLiquidity};

pub use dex::{Address, DexProtocol, EncodedExchange, H256, U256};

/// Cells or candidates a batch query evaluates at once; results keep input
/// order
pub(crate) const MAX_IN_FLIGHT: usize = 16;
