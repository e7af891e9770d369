//! Normalized exchange rates
//!
//! A rate is the observed output rescaled to one whole unit of the input
//! token: `amount_out * 10^decimals_in / amount_in`. It is a linear
//! extrapolation of the quote for `amount_in`, not a fresh simulation of a
//! one-unit trade, so it carries the slippage of the sampled size.

use amm::full_math::mul_div;
use amm::MathError;
use dex::{Address, EncodedExchange, U256};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScannerError};
use crate::locator::PoolLocator;
use crate::quoter::ProtocolQuoter;

/// Rate and pool of one market; zero rate and zero pool mean no liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub rate: U256,
    pub pool: Address,
}

impl ExchangeQuote {
    pub fn no_liquidity() -> Self {
        Self {
            rate: U256::zero(),
            pool: Address::zero(),
        }
    }

    pub fn has_liquidity(&self) -> bool {
        !self.rate.is_zero() && !self.pool.is_zero()
    }
}

/// Rates of every (quote token, exchange) cell in both directions
///
/// Row-major: the cell for `quotes[i]` on `exchanges[j]` is at
/// `i * exchanges.len() + j`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidirectionalRates {
    /// Base token sold for the quote token
    pub forward: Vec<U256>,
    /// Quote token sold for the base token
    pub reverse: Vec<U256>,
    pub pools: Vec<Address>,
}

impl BidirectionalRates {
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// `amount_out` per whole unit of an input with `decimals` decimals
pub fn normalize_rate(amount_out: U256, amount_in: U256, decimals: u8) -> Result<U256> {
    let scale = U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or(MathError::Overflow {
            operation: "decimal scale",
        })?;
    Ok(mul_div(amount_out, scale, amount_in)?)
}

#[derive(Clone)]
pub struct ExchangeRateEngine {
    locator: PoolLocator,
    quoter: ProtocolQuoter,
}

impl ExchangeRateEngine {
    pub fn new(locator: PoolLocator, quoter: ProtocolQuoter) -> Self {
        Self { locator, quoter }
    }

    /// Rate of selling `amount_in` of `token_in` for `token_out` on one
    /// exchange
    pub async fn get_exchange_rate(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        exchange: EncodedExchange,
    ) -> Result<ExchangeQuote> {
        let Some(pool) = self.locator.locate(token_in, token_out, exchange)? else {
            return Ok(ExchangeQuote::no_liquidity());
        };

        let amount_out = self.quoter.quote(&pool, token_in, amount_in).await?;
        if amount_out.is_zero() {
            return Ok(ExchangeQuote::no_liquidity());
        }

        // Decimals only matter once there is something to normalize
        let decimals = self.quoter.ledger().token_decimals(token_in).await?;
        let rate = normalize_rate(amount_out, amount_in, decimals)?;
        if rate.is_zero() {
            return Ok(ExchangeQuote::no_liquidity());
        }

        Ok(ExchangeQuote {
            rate,
            pool: pool.address,
        })
    }

    /// Forward and reverse rates between `base` and every quote token on
    /// every exchange
    ///
    /// Up to [`MAX_IN_FLIGHT`](crate::MAX_IN_FLIGHT) cells are quoted at
    /// once; results are assembled in row-major order.
    pub async fn get_multiple_exchange_rates_both(
        &self,
        base: Address,
        base_amount: U256,
        quotes: &[Address],
        quote_amounts: &[U256],
        exchanges: &[EncodedExchange],
    ) -> Result<BidirectionalRates> {
        ScannerError::check_length("quote amounts", quotes.len(), quote_amounts.len())?;

        let cells = quotes
            .iter()
            .zip(quote_amounts)
            .flat_map(|(&quote, &quote_amount)| {
                exchanges
                    .iter()
                    .map(move |&exchange| (quote, quote_amount, exchange))
            });

        let quoted: Vec<(ExchangeQuote, ExchangeQuote)> = stream::iter(cells)
            .map(|(quote, quote_amount, exchange)| async move {
                futures::try_join!(
                    self.get_exchange_rate(base, quote, base_amount, exchange),
                    self.get_exchange_rate(quote, base, quote_amount, exchange),
                )
            })
            .buffered(crate::MAX_IN_FLIGHT)
            .try_collect()
            .await?;

        let mut rates = BidirectionalRates {
            forward: Vec::with_capacity(quoted.len()),
            reverse: Vec::with_capacity(quoted.len()),
            pools: Vec::with_capacity(quoted.len()),
        };
        for (forward, reverse) in quoted {
            rates.forward.push(forward.rate);
            rates.reverse.push(reverse.rate);
            // Both directions trade through the same pool
            rates.pools.push(if forward.pool.is_zero() {
                reverse.pool
            } else {
                forward.pool
            });
        }

        let live = rates.pools.iter().filter(|pool| !pool.is_zero()).count();
        crate::log_metrics!(
            "{} of {} markets live for base {:?}",
            live,
            rates.len(),
            base
        );
        debug!("Quoted {} tokens on {} exchanges", quotes.len(), exchanges.len());
        Ok(rates)
    }
}
