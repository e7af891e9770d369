//! Protocol quoter: exact swap output through a located pool

use std::sync::Arc;

use dex::{Address, U256};
use tracing::debug;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::locator::LocatedPool;
use crate::protocols::family;
use crate::registry::DexRegistry;

#[derive(Clone)]
pub struct ProtocolQuoter {
    registry: Arc<DexRegistry>,
    ledger: Arc<dyn Ledger>,
}

impl ProtocolQuoter {
    pub fn new(registry: Arc<DexRegistry>, ledger: Arc<dyn Ledger>) -> Self {
        Self { registry, ledger }
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Output of selling `amount_in` of `token_in` into `pool`, zero when
    /// the market has no liquidity
    pub async fn quote(&self, pool: &LocatedPool, token_in: Address, amount_in: U256) -> Result<U256> {
        let dex = self.registry.lookup(pool.dex_id)?;
        let protocol = family(dex.protocol);
        let amount_out = protocol
            .quote(self.ledger(), dex, pool.address, pool.fee, token_in, amount_in)
            .await?;
        debug!(
            "{} quote {:?}: {} in -> {} out",
            protocol.protocol(),
            pool.address,
            amount_in,
            amount_out
        );
        Ok(amount_out)
    }

    /// Slippage-free output at the pool's pre-trade price
    pub async fn expected_output(
        &self,
        pool: &LocatedPool,
        token_in: Address,
        amount_in: U256,
    ) -> Result<U256> {
        family(pool.protocol)
            .expected_output(self.ledger(), pool.address, pool.fee, token_in, amount_in)
            .await
    }
}
