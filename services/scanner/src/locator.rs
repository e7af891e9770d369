//! Pool locator: two tokens and an encoded exchange to a pool address
//!
//! Addresses are derived, never looked up, so a located pool may not be
//! deployed. Whether it is live is for the quoter to find out.

use std::sync::Arc;

use dex::{sort_tokens, Address, DexProtocol, EncodedExchange};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::protocols::family;
use crate::registry::DexRegistry;

/// A candidate market on one dex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedPool {
    pub address: Address,
    pub dex_id: u8,
    pub protocol: DexProtocol,
    /// Fee the pool charges: bps for constant product, pips for
    /// concentrated liquidity, 0 for Algebra (the pool's own dynamic fee)
    pub fee: u32,
}

#[derive(Debug, Clone)]
pub struct PoolLocator {
    registry: Arc<DexRegistry>,
}

impl PoolLocator {
    pub fn new(registry: Arc<DexRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<DexRegistry> {
        &self.registry
    }

    /// Pool for `token_a`/`token_b` on the encoded dex and fee
    ///
    /// Unknown dexes and unregistered fees are errors; identical or zero
    /// tokens have no pool.
    pub fn locate(
        &self,
        token_a: Address,
        token_b: Address,
        exchange: EncodedExchange,
    ) -> Result<Option<LocatedPool>> {
        let (dex_id, encoded_fee) = exchange.decode();
        let dex = self.registry.lookup(dex_id)?;
        let fee = dex.effective_fee(encoded_fee)?;

        if token_a == token_b || token_a.is_zero() || token_b.is_zero() {
            return Ok(None);
        }

        let (token0, token1) = sort_tokens(token_a, token_b);
        let address = family(dex.protocol).pool_address(dex, token0, token1, fee);
        trace!("Located {:?} for {} ({})", address, exchange, dex.protocol);

        Ok(Some(LocatedPool {
            address,
            dex_id,
            protocol: dex.protocol,
            fee,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScannerError;
    use crate::registry::DexConfig;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn locator() -> PoolLocator {
        let registry = DexRegistry::from_configs(vec![
            DexConfig::new(
                0,
                DexProtocol::ConstantProduct,
                addr(10),
                addr(11),
                Address::zero(),
                vec![25],
            ),
            DexConfig::new(
                2,
                DexProtocol::ConcentratedLiquidity,
                addr(20),
                addr(21),
                addr(22),
                vec![500, 3000, 10000],
            ),
        ])
        .unwrap();
        PoolLocator::new(Arc::new(registry))
    }

    fn exchange(dex_id: u8, fee: u32) -> EncodedExchange {
        EncodedExchange::new(dex_id, fee).unwrap()
    }

    #[test]
    fn test_token_order_does_not_matter() {
        let locator = locator();
        let forward = locator.locate(addr(1), addr(2), exchange(2, 500)).unwrap();
        let reverse = locator.locate(addr(2), addr(1), exchange(2, 500)).unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.unwrap().fee, 500);
    }

    #[test]
    fn test_constant_product_ignores_encoded_fee() {
        let locator = locator();
        let zero_fee = locator.locate(addr(1), addr(2), exchange(0, 0)).unwrap().unwrap();
        let explicit_fee = locator.locate(addr(1), addr(2), exchange(0, 25)).unwrap().unwrap();
        let other_fee = locator.locate(addr(1), addr(2), exchange(0, 30)).unwrap().unwrap();
        assert_eq!(zero_fee.address, explicit_fee.address);
        assert_eq!(zero_fee, other_fee);
        assert_eq!(other_fee.fee, 25);
    }

    #[test]
    fn test_algebra_pool_from_deployer() {
        let registry = DexRegistry::from_configs(vec![DexConfig::new(
            1,
            DexProtocol::Algebra,
            addr(30),
            addr(31),
            addr(32),
            vec![],
        )
        .with_pool_deployer(addr(33))])
        .unwrap();
        let locator = PoolLocator::new(Arc::new(registry));

        let pool = locator.locate(addr(2), addr(1), exchange(1, 0)).unwrap().unwrap();
        let labelled = locator.locate(addr(1), addr(2), exchange(1, 3000)).unwrap().unwrap();
        assert_eq!(pool, labelled);
        assert_eq!(pool.fee, 0);
        assert_eq!(
            pool.address,
            dex::algebra_pool_address(addr(33), addr(1), addr(2), dex::ALGEBRA_INIT_CODE_HASH)
        );
    }

    #[test]
    fn test_fee_tiers_select_pools() {
        let locator = locator();
        let low = locator.locate(addr(1), addr(2), exchange(2, 500)).unwrap().unwrap();
        let high = locator.locate(addr(1), addr(2), exchange(2, 10000)).unwrap().unwrap();
        assert_ne!(low.address, high.address);
    }

    #[test]
    fn test_unregistered_fee_and_dex() {
        let locator = locator();
        assert!(matches!(
            locator.locate(addr(1), addr(2), exchange(2, 100)),
            Err(ScannerError::UnknownFeeTier { dex_id: 2, fee: 100 })
        ));
        assert!(matches!(
            locator.locate(addr(1), addr(2), exchange(9, 0)),
            Err(ScannerError::UnknownDex { dex_id: 9 })
        ));
    }

    #[test]
    fn test_degenerate_tokens_have_no_pool() {
        let locator = locator();
        assert!(locator.locate(addr(1), addr(1), exchange(2, 500)).unwrap().is_none());
        assert!(locator
            .locate(Address::zero(), addr(1), exchange(0, 0))
            .unwrap()
            .is_none());
    }
}
