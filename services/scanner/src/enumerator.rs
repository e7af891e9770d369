//! Constant-product pair enumeration by factory creation index
//!
//! Only constant-product factories keep a flat pair list; other dexes
//! report zero pairs.

use std::sync::Arc;

use dex::Address;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScannerError};
use crate::ledger::{Ledger, LedgerError};
use crate::registry::DexRegistry;

/// `tokens[2i]` and `tokens[2i + 1]` are the sorted constituents of `pairs[i]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairsAndTokens {
    pub pairs: Vec<Address>,
    pub tokens: Vec<Address>,
}

#[derive(Clone)]
pub struct PairEnumerator {
    registry: Arc<DexRegistry>,
    ledger: Arc<dyn Ledger>,
}

impl PairEnumerator {
    pub fn new(registry: Arc<DexRegistry>, ledger: Arc<dyn Ledger>) -> Self {
        Self { registry, ledger }
    }

    fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Pair count per dex id, zero for dexes without a pair index
    pub async fn total_pairs(&self, dex_ids: &[u8]) -> Result<Vec<u64>> {
        let dexes = dex_ids
            .iter()
            .map(|&dex_id| self.registry.lookup(dex_id))
            .collect::<Result<Vec<_>>>()?;

        let ledger = self.ledger();
        try_join_all(dexes.into_iter().map(|dex| async move {
            let count = if dex.protocol.has_pair_index() {
                ledger.all_pairs_length(dex.factory).await?
            } else {
                0
            };
            Ok::<_, ScannerError>(count)
        }))
        .await
    }

    /// `count` pairs of `factory` starting at creation index `start`
    pub async fn get_pairs_and_tokens(
        &self,
        factory: Address,
        start: u64,
        count: u64,
    ) -> Result<PairsAndTokens> {
        let total = self.ledger().all_pairs_length(factory).await?;
        let out_of_range = ScannerError::OutOfRange {
            start,
            count,
            total,
        };
        match start.checked_add(count) {
            Some(end) if end <= total => {}
            _ => return Err(out_of_range),
        }

        let ledger = self.ledger();
        let pairs: Vec<(Address, Address, Address)> = stream::iter(start..start + count)
            .map(|index| async move {
                let pair = ledger.pair_at(factory, index).await?;
                let state = ledger
                    .pair_state(pair)
                    .await?
                    .ok_or(LedgerError::InvalidResponse {
                        address: pair,
                        reason: format!("pair {index} of factory {factory:?} has no code"),
                    })?;
                Ok::<_, ScannerError>((pair, state.token0, state.token1))
            })
            .buffered(crate::MAX_IN_FLIGHT)
            .try_collect()
            .await?;

        let mut result = PairsAndTokens {
            pairs: Vec::with_capacity(pairs.len()),
            tokens: Vec::with_capacity(pairs.len() * 2),
        };
        for (pair, token0, token1) in pairs {
            result.pairs.push(pair);
            result.tokens.push(token0);
            result.tokens.push(token1);
        }
        crate::log_pool!(
            "Enumerated pairs {}..{} of factory {:?}",
            start,
            start + count,
            factory
        );
        Ok(result)
    }
}
