//! Multi-hop trade simulation
//!
//! Hops run in order, each selling the previous hop's output. The trade is
//! atomic: a hop without a pool or with zero output aborts the whole
//! simulation and no partial result escapes.

use dex::{Address, EncodedExchange, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScannerError};
use crate::locator::PoolLocator;
use crate::quoter::ProtocolQuoter;

/// One executed hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopResult {
    pub token_in: Address,
    pub token_out: Address,
    pub exchange: EncodedExchange,
    pub pool: Address,
    pub amount_in: U256,
    pub amount_out: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSimulation {
    pub amount_in: U256,
    pub amount_out: U256,
    pub hops: Vec<HopResult>,
}

impl TradeSimulation {
    /// Gain of a cyclic path, `None` when the path is open or loses
    ///
    /// Gas is not accounted for.
    pub fn profit(&self) -> Option<U256> {
        let first = self.hops.first()?;
        let last = self.hops.last()?;
        if first.token_in != last.token_out || self.amount_out <= self.amount_in {
            return None;
        }
        Some(self.amount_out - self.amount_in)
    }
}

#[derive(Clone)]
pub struct TradeSimulator {
    locator: PoolLocator,
    quoter: ProtocolQuoter,
}

impl TradeSimulator {
    pub fn new(locator: PoolLocator, quoter: ProtocolQuoter) -> Self {
        Self { locator, quoter }
    }

    /// Final output of trading `amount_in` of `path[0]` along `path`
    pub async fn simulate_trade(
        &self,
        path: &[Address],
        exchanges: &[EncodedExchange],
        amount_in: U256,
    ) -> Result<U256> {
        Ok(self
            .simulate_trade_detailed(path, exchanges, amount_in)
            .await?
            .amount_out)
    }

    /// Like [`TradeSimulator::simulate_trade`], reporting every hop
    pub async fn simulate_trade_detailed(
        &self,
        path: &[Address],
        exchanges: &[EncodedExchange],
        amount_in: U256,
    ) -> Result<TradeSimulation> {
        if exchanges.is_empty() || path.len() != exchanges.len() + 1 {
            return Err(ScannerError::PathLength {
                tokens: path.len(),
                exchanges: exchanges.len(),
            });
        }

        let mut hops = Vec::with_capacity(exchanges.len());
        let mut amount = amount_in;
        for (hop, (tokens, &exchange)) in path.windows(2).zip(exchanges).enumerate() {
            let (token_in, token_out) = (tokens[0], tokens[1]);
            let abort = |reason: &str| {
                crate::log_warning!("Trade aborted at hop {} on {}: {}", hop, exchange, reason);
                ScannerError::TradeAborted {
                    hop,
                    token_in,
                    token_out,
                    reason: reason.to_string(),
                }
            };

            let pool = self
                .locator
                .locate(token_in, token_out, exchange)?
                .ok_or_else(|| abort("no pool"))?;
            let amount_out = self.quoter.quote(&pool, token_in, amount).await?;
            if amount_out.is_zero() {
                return Err(abort("no liquidity"));
            }

            debug!(
                "Hop {}: {} {:?} -> {} {:?} via {:?}",
                hop, amount, token_in, amount_out, token_out, pool.address
            );
            hops.push(HopResult {
                token_in,
                token_out,
                exchange,
                pool: pool.address,
                amount_in: amount,
                amount_out,
            });
            amount = amount_out;
        }

        let simulation = TradeSimulation {
            amount_in,
            amount_out: amount,
            hops,
        };
        if let Some(profit) = simulation.profit() {
            crate::log_profit!("Cyclic path returns {} on {}", profit, amount_in);
        }
        Ok(simulation)
    }
}
