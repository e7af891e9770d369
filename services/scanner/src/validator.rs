//! Liquidity validator
//!
//! Screens candidate tokens: a candidate passes when selling a reference
//! amount of some reference token into it, on some registered dex, fills
//! with slippage no worse than that reference's tolerance. Slippage is
//! measured against the pool's pre-trade price net of fee.

use amm::slippage::within_tolerance;
use dex::{Address, EncodedExchange, U256};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, ScannerError};
use crate::locator::PoolLocator;
use crate::quoter::ProtocolQuoter;

/// Liquidity a candidate must offer against one reference token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLiquidity {
    pub token: Address,
    /// Raw units of `token` to sell into the candidate
    pub amount: U256,
    pub max_slippage_bps: u32,
}

#[derive(Clone)]
pub struct LiquidityValidator {
    locator: PoolLocator,
    quoter: ProtocolQuoter,
}

impl LiquidityValidator {
    pub fn new(locator: PoolLocator, quoter: ProtocolQuoter) -> Self {
        Self { locator, quoter }
    }

    /// One entry per candidate, in order: the candidate when it passes,
    /// the zero address otherwise
    pub async fn validate_tokens(
        &self,
        candidates: &[Address],
        dex_ids: &[u8],
        reference_tokens: &[Address],
        reference_amounts: &[U256],
        max_slippage_bps: &[u32],
    ) -> Result<Vec<Address>> {
        ScannerError::check_length(
            "reference amounts",
            reference_tokens.len(),
            reference_amounts.len(),
        )?;
        ScannerError::check_length(
            "max slippage",
            reference_tokens.len(),
            max_slippage_bps.len(),
        )?;

        let references: Vec<ReferenceLiquidity> = reference_tokens
            .iter()
            .zip(reference_amounts)
            .zip(max_slippage_bps)
            .map(|((&token, &amount), &max_slippage_bps)| ReferenceLiquidity {
                token,
                amount,
                max_slippage_bps,
            })
            .collect();
        self.validate_against(candidates, dex_ids, &references).await
    }

    /// [`LiquidityValidator::validate_tokens`] over prepared references
    pub async fn validate_against(
        &self,
        candidates: &[Address],
        dex_ids: &[u8],
        references: &[ReferenceLiquidity],
    ) -> Result<Vec<Address>> {
        let markets = self.markets(dex_ids)?;

        let markets = &markets;
        let results: Vec<Address> = stream::iter(candidates.iter().copied())
            .map(|candidate| async move {
                let valid = self.is_liquid(candidate, markets, references).await?;
                Ok::<_, ScannerError>(if valid { candidate } else { Address::zero() })
            })
            .buffered(crate::MAX_IN_FLIGHT)
            .try_collect()
            .await?;

        let passed = results.iter().filter(|token| !token.is_zero()).count();
        crate::log_search!(
            "{} of {} candidates passed liquidity validation",
            passed,
            candidates.len()
        );
        Ok(results)
    }

    /// Exchanges to try per dex id, in dex id order then fee tier order
    fn markets(&self, dex_ids: &[u8]) -> Result<Vec<EncodedExchange>> {
        let registry = self.locator.registry();
        let mut markets = Vec::new();
        for &dex_id in dex_ids {
            let dex = registry.lookup(dex_id)?;
            for &fee in dex.market_fees() {
                markets.push(EncodedExchange::new(dex_id, fee)?);
            }
        }
        Ok(markets)
    }

    /// Short-circuits on the first passing (reference, market) combination
    async fn is_liquid(
        &self,
        candidate: Address,
        markets: &[EncodedExchange],
        references: &[ReferenceLiquidity],
    ) -> Result<bool> {
        for reference in references {
            for &market in markets {
                let Some(pool) = self.locator.locate(reference.token, candidate, market)? else {
                    continue;
                };

                let actual = self
                    .quoter
                    .quote(&pool, reference.token, reference.amount)
                    .await?;
                if actual.is_zero() {
                    continue;
                }
                let expected = self
                    .quoter
                    .expected_output(&pool, reference.token, reference.amount)
                    .await?;
                if expected.is_zero() {
                    continue;
                }

                trace!(
                    "{:?} via {} against {:?}: {} out, {} at spot",
                    candidate,
                    market,
                    reference.token,
                    actual,
                    expected
                );
                if within_tolerance(actual, expected, reference.max_slippage_bps) {
                    debug!(
                        "{:?} valid on {} against {:?} (max {} bps)",
                        candidate, market, reference.token, reference.max_slippage_bps
                    );
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
