//! Shared fixture: a two-dex registry over an in-memory ledger seeded with
//! Polygon token addresses

#![allow(dead_code)]

use std::sync::Arc;

use amm::v3_math::sqrt_ratio_at_tick;
use amm::V3PoolState;
use arbitrage_scanner::{
    Address, ArbitrageScanner, DexConfig, DexProtocol, DexRegistry, EncodedExchange,
    InMemoryLedger, U256,
};
use dex::{ALGEBRA_INIT_CODE_HASH, UNISWAP_V2_INIT_CODE_HASH, UNISWAP_V3_INIT_CODE_HASH};
use scanner_config::polygon::tokens;

pub const CONSTANT_PRODUCT_DEX: u8 = 0;
pub const ALGEBRA_DEX: u8 = 1;
pub const CONCENTRATED_DEX: u8 = 2;
pub const CONSTANT_PRODUCT_FEE: u32 = 25;

pub fn token(address: &str) -> Address {
    address.parse().unwrap()
}

pub fn wbtc() -> Address {
    token(tokens::WBTC)
}
pub fn usdc() -> Address {
    token(tokens::USDC)
}
pub fn usdt() -> Address {
    token(tokens::USDT)
}
pub fn usdce() -> Address {
    token(tokens::USDCE)
}
pub fn wmatic() -> Address {
    token(tokens::WMATIC)
}
pub fn link() -> Address {
    token(tokens::LINK)
}
/// Token with no pools anywhere
pub fn unlisted() -> Address {
    token("0x263026e7e53dbfdce5ae55ade22493f828922965")
}

pub fn factory_v2() -> Address {
    Address::from_low_u64_be(0xf2)
}
pub fn factory_v3() -> Address {
    Address::from_low_u64_be(0xf3)
}
pub fn quoter_v3() -> Address {
    Address::from_low_u64_be(0x93)
}
pub fn factory_algebra() -> Address {
    Address::from_low_u64_be(0xf4)
}
pub fn deployer_algebra() -> Address {
    Address::from_low_u64_be(0xd4)
}
pub fn quoter_algebra() -> Address {
    Address::from_low_u64_be(0x94)
}

/// `whole * 10^decimals`
pub fn units(whole: u64, decimals: usize) -> U256 {
    U256::from(whole) * U256::exp10(decimals)
}

pub fn exchange(dex_id: u8, fee: u32) -> EncodedExchange {
    EncodedExchange::new(dex_id, fee).unwrap()
}

/// Dex 0: constant product at 25 bps. Dex 2: concentrated liquidity with
/// tiers 500, 3000 and 10000.
pub fn scanner(ledger: Arc<InMemoryLedger>) -> ArbitrageScanner {
    let registry = ArbitrageScanner::initialize_registry(
        &[CONSTANT_PRODUCT_DEX, CONCENTRATED_DEX],
        &[DexProtocol::ConstantProduct, DexProtocol::ConcentratedLiquidity],
        &[factory_v2(), factory_v3()],
        &[Address::from_low_u64_be(0xa2), Address::from_low_u64_be(0xa3)],
        &[Address::zero(), quoter_v3()],
        &[vec![CONSTANT_PRODUCT_FEE], vec![500, 3000, 10000]],
    )
    .unwrap();
    ArbitrageScanner::new(registry, ledger)
}

/// The two-dex scanner plus an Algebra dex 1 with its own pool deployer
pub fn scanner_with_algebra(ledger: Arc<InMemoryLedger>) -> ArbitrageScanner {
    let base = scanner(Arc::clone(&ledger));
    let mut configs: Vec<DexConfig> = base.registry().iter().cloned().collect();
    configs.push(
        DexConfig::new(
            ALGEBRA_DEX,
            DexProtocol::Algebra,
            factory_algebra(),
            Address::from_low_u64_be(0xa4),
            quoter_algebra(),
            vec![],
        )
        .with_pool_deployer(deployer_algebra()),
    );
    let registry = DexRegistry::from_configs(configs).unwrap();
    ArbitrageScanner::new(Arc::new(registry), ledger)
}

/// Ledger with only token metadata and an empty factory
pub fn empty_ledger() -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    for (token, decimals) in [
        (wbtc(), 8),
        (usdc(), 6),
        (usdt(), 6),
        (usdce(), 6),
        (wmatic(), 18),
        (link(), 18),
        (unlisted(), 18),
    ] {
        ledger.set_decimals(token, decimals);
    }
    ledger.register_factory(factory_v2());
    ledger.register_quoter(quoter_v3(), factory_v3(), UNISWAP_V3_INIT_CODE_HASH);
    ledger.register_algebra_quoter(quoter_algebra(), deployer_algebra(), ALGEBRA_INIT_CODE_HASH);
    ledger
}

pub fn deploy_pair(
    ledger: &InMemoryLedger,
    token_a: Address,
    token_b: Address,
    reserve_a: U256,
    reserve_b: U256,
) -> Address {
    ledger.deploy_pair(
        factory_v2(),
        UNISWAP_V2_INIT_CODE_HASH,
        token_a,
        token_b,
        reserve_a,
        reserve_b,
    )
}

/// Pool around `tick` with one wide position of `liquidity`
pub fn deploy_pool(
    ledger: &InMemoryLedger,
    token_a: Address,
    token_b: Address,
    fee: u32,
    tick_spacing: i32,
    tick: i32,
    liquidity: u128,
) -> Address {
    let width = tick_spacing * 500;
    let lower = (tick / tick_spacing) * tick_spacing - width;
    let upper = (tick / tick_spacing) * tick_spacing + width;
    let pool = V3PoolState::new(sqrt_ratio_at_tick(tick).unwrap(), fee, tick_spacing)
        .unwrap()
        .with_position(lower, upper, liquidity)
        .unwrap();
    ledger.deploy_concentrated_pool(factory_v3(), UNISWAP_V3_INIT_CODE_HASH, token_a, token_b, pool)
}

/// Pool (tick spacing 60) priced at `tick` whose only position is
/// `[lower, upper)`, so the current price may sit outside every position
pub fn deploy_pool_in_range(
    ledger: &InMemoryLedger,
    token_a: Address,
    token_b: Address,
    fee: u32,
    tick: i32,
    (lower, upper): (i32, i32),
    liquidity: u128,
) -> Address {
    let pool = V3PoolState::new(sqrt_ratio_at_tick(tick).unwrap(), fee, 60)
        .unwrap()
        .with_position(lower, upper, liquidity)
        .unwrap();
    ledger.deploy_concentrated_pool(factory_v3(), UNISWAP_V3_INIT_CODE_HASH, token_a, token_b, pool)
}

/// Algebra pool around `tick` charging `dynamic_fee` pips
pub fn deploy_algebra_pool(
    ledger: &InMemoryLedger,
    token_a: Address,
    token_b: Address,
    dynamic_fee: u32,
    tick: i32,
    liquidity: u128,
) -> Address {
    let tick_spacing = 60;
    let base = (tick / tick_spacing) * tick_spacing;
    let pool = V3PoolState::new(sqrt_ratio_at_tick(tick).unwrap(), dynamic_fee, tick_spacing)
        .unwrap()
        .with_position(base - 30_000, base + 30_000, liquidity)
        .unwrap();
    ledger.deploy_algebra_pool(deployer_algebra(), ALGEBRA_INIT_CODE_HASH, token_a, token_b, pool)
}

/// Market used across the suite:
/// - WBTC/USDC on dex 2 at 500 pips, about 65,000 USDC per WBTC
/// - WBTC/USDT on dex 0, 10 WBTC against 650,000 USDT
/// - WMATIC/USDC on dex 0, deep
/// - LINK/USDC on dex 0, shallow
/// - USDT/USDCE on dex 2 at 3000 pips, near parity
pub fn seeded_ledger() -> InMemoryLedger {
    let ledger = empty_ledger();

    // WBTC (token0, 8 decimals) priced in USDC (token1, 6 decimals):
    // 650 raw USDC per raw WBTC, 1.0001^64770 ~ 649.8
    assert!(wbtc() < usdc());
    deploy_pool(&ledger, wbtc(), usdc(), 500, 10, 64_770, 10u128.pow(15));

    deploy_pair(&ledger, wbtc(), usdt(), units(10, 8), units(650_000, 6));
    deploy_pair(&ledger, wmatic(), usdc(), units(20_000_000, 18), units(10_000_000, 6));
    deploy_pair(&ledger, link(), usdc(), units(100, 18), units(1_000, 6));

    deploy_pool(&ledger, usdt(), usdce(), 3000, 60, 0, 10u128.pow(15));
    ledger
}
