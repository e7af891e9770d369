//! AMM protocol families

use ethereum_types::H256;
use serde::{Deserialize, Serialize};

/// Uniswap V2 pair init code hash, shared by QuickSwap V2
/// keccak256(UniswapV2Pair creation code)
pub const UNISWAP_V2_INIT_CODE_HASH: H256 = H256([
    0x96, 0xe8, 0xac, 0x42, 0x77, 0x19, 0x8f, 0xf8, 0xb6, 0xf7, 0x85, 0x47, 0x8a, 0xa9, 0xa3, 0x9f,
    0x40, 0x3c, 0xb7, 0x68, 0xdd, 0x02, 0xcb, 0xee, 0x32, 0x6c, 0x3e, 0x7d, 0xa3, 0x48, 0x84, 0x5f,
]);

/// SushiSwap pair init code hash
pub const SUSHISWAP_INIT_CODE_HASH: H256 = H256([
    0xe1, 0x8a, 0x34, 0xeb, 0x0e, 0x04, 0xb0, 0x4f, 0x7a, 0x0a, 0xc2, 0x9a, 0x6e, 0x80, 0x74, 0x8d,
    0xca, 0x96, 0x31, 0x9b, 0x42, 0xc5, 0x20, 0xb3, 0xf9, 0xbf, 0xb6, 0xfa, 0x7a, 0xac, 0x9e, 0xe0,
]);

/// Uniswap V3 `POOL_INIT_CODE_HASH`
pub const UNISWAP_V3_INIT_CODE_HASH: H256 = H256([
    0xe3, 0x4f, 0x19, 0x9b, 0x19, 0xb2, 0xb4, 0xf4, 0x7f, 0x68, 0x44, 0x26, 0x19, 0xd5, 0x55, 0x52,
    0x7d, 0x24, 0x4f, 0x78, 0xa3, 0x29, 0x7e, 0xa8, 0x93, 0x25, 0xf8, 0x43, 0xf8, 0x7b, 0x8b, 0x54,
]);

/// Algebra pool init code hash, as deployed by QuickSwap V3 on Polygon
pub const ALGEBRA_INIT_CODE_HASH: H256 = H256([
    0x6e, 0xc6, 0xc9, 0xc8, 0x09, 0x1d, 0x16, 0x0c, 0x0a, 0xa7, 0x4b, 0x2b, 0x14, 0xba, 0x9c, 0x17,
    0x17, 0xe9, 0x50, 0x93, 0xbd, 0x3a, 0xc0, 0x85, 0xce, 0xe9, 0x9a, 0x49, 0xaa, 0xb2, 0x94, 0xa4,
]);

/// Pricing model of a dex
///
/// - `ConstantProduct`: x*y=k pairs, one pool per token pair, fee embedded
///   in the pair (Uniswap V2, QuickSwap V2, SushiSwap)
/// - `ConcentratedLiquidity`: tick-ranged liquidity, one pool per
///   (token pair, fee tier) (Uniswap V3)
/// - `Algebra`: tick-ranged liquidity with one pool per token pair and a
///   dynamic fee read from the pool (QuickSwap V3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DexProtocol {
    #[serde(alias = "uniswap_v2")]
    ConstantProduct,
    #[serde(alias = "uniswap_v3")]
    ConcentratedLiquidity,
    #[serde(alias = "quickswap_v3")]
    Algebra,
}

impl DexProtocol {
    /// Init code hash of the canonical deployment of this family
    pub fn default_init_code_hash(self) -> H256 {
        match self {
            DexProtocol::ConstantProduct => UNISWAP_V2_INIT_CODE_HASH,
            DexProtocol::ConcentratedLiquidity => UNISWAP_V3_INIT_CODE_HASH,
            DexProtocol::Algebra => ALGEBRA_INIT_CODE_HASH,
        }
    }

    /// Whether the fee selects between distinct pools of the same pair
    pub fn fee_selects_pool(self) -> bool {
        matches!(self, DexProtocol::ConcentratedLiquidity)
    }

    /// Whether the factory keeps a flat, indexed pair list
    pub fn has_pair_index(self) -> bool {
        matches!(self, DexProtocol::ConstantProduct)
    }
}

impl std::fmt::Display for DexProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DexProtocol::ConstantProduct => write!(f, "constant_product"),
            DexProtocol::ConcentratedLiquidity => write!(f, "concentrated_liquidity"),
            DexProtocol::Algebra => write!(f, "algebra"),
        }
    }
}
