//! Polygon PoS deployment constants
//!
//! Addresses of the dexes and tokens the scanner targets on chain 137.

pub const CHAIN_ID: u64 = 137;

/// Default public RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";

/// Zero address constant for absent quoters and the no-liquidity sentinel
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Dex ids as used in encoded exchanges
pub mod dex_ids {
    pub const QUICKSWAP_V2: u8 = 0;
    pub const QUICKSWAP_V3: u8 = 1;
    pub const UNISWAP_V3: u8 = 2;
    pub const SUSHISWAP_V2: u8 = 3;
}

pub mod quickswap_v2 {
    pub const FACTORY: &str = "0x5757371414417b8C6CAad45bAeF941aBc7d3Ab32";
    pub const ROUTER: &str = "0xa5E0829CaCEd8fFDD4De3c43696c57F7D7A678ff";
    /// Pair fee in basis points
    pub const FEE_BPS: u32 = 25;
}

/// Algebra deployment: pools are created by a separate deployer contract
/// and charge a dynamic fee
pub mod quickswap_v3 {
    pub const FACTORY: &str = "0x411b0fAcC3489691f28ad58c47006AF5E3Ab3A28";
    pub const POOL_DEPLOYER: &str = "0x2D98E2FA9da15aa6dC9581AB097Ced7af697CB92";
    pub const ROUTER: &str = "0xf5b509bB0909a69B1c207E495f687a596C168E12";
    pub const QUOTER: &str = "0xa15F0D7377B2A0C0c10db057f641beD21028FC89";
}

pub mod uniswap_v3 {
    pub const FACTORY: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";
    pub const ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";
    pub const QUOTER: &str = "0xb27308f9F90D607463bb33eA1BeBb41C27CE5AB6";
    /// Fee tiers in pips
    pub const FEE_TIERS: [u32; 3] = [500, 3000, 10000];
}

pub mod sushiswap_v2 {
    pub const FACTORY: &str = "0xc35DADB65012eC5796536bD9864eD8773aBc74C4";
    pub const ROUTER: &str = "0x1b02dA8Cb0d097eB8D57A175b88c7D8b47997506";
    pub const INIT_CODE_HASH: &str =
        "0xe18a34eb0e04b04f7a0ac29a6e80748dca96319b42c520b3f9bfb6fa7aac9ee0";
    pub const FEE_BPS: u32 = 30;
}

pub mod tokens {
    pub const WMATIC: &str = "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270";
    pub const WETH: &str = "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619";
    /// Native USDC
    pub const USDC: &str = "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359";
    /// Bridged USDC.e
    pub const USDCE: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";
    pub const USDT: &str = "0xc2132D05D31c914a87C6611C10748AEb04B58e8F";
    pub const WBTC: &str = "0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6";
    pub const LINK: &str = "0x53E0bca35eC356BD5ddDFebbD1Fc0fD03FaBad39";
}

/// Reference liquidity requirement: trading `amount` whole units of the
/// reference token into a candidate must slip at most `max_slippage_bps`
#[derive(Debug, Clone, Copy)]
pub struct ReferencePair {
    pub symbol: &'static str,
    pub address: &'static str,
    pub decimals: u8,
    pub amount: &'static str,
    pub max_slippage_bps: u32,
}

/// Reference tokens candidates are validated against, in search order.
/// 50 bps is 0.5%.
pub const REFERENCE_PAIRS: [ReferencePair; 5] = [
    ReferencePair {
        symbol: "WMATIC",
        address: tokens::WMATIC,
        decimals: 18,
        amount: "10000",
        max_slippage_bps: 50,
    },
    ReferencePair {
        symbol: "WETH",
        address: tokens::WETH,
        decimals: 18,
        amount: "3",
        max_slippage_bps: 50,
    },
    ReferencePair {
        symbol: "USDC",
        address: tokens::USDC,
        decimals: 6,
        amount: "10000",
        max_slippage_bps: 50,
    },
    ReferencePair {
        symbol: "USDCE",
        address: tokens::USDCE,
        decimals: 6,
        amount: "10000",
        max_slippage_bps: 50,
    },
    ReferencePair {
        symbol: "USDT",
        address: tokens::USDT,
        decimals: 6,
        amount: "10000",
        max_slippage_bps: 50,
    },
];
