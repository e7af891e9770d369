//! Default Polygon Configuration Tests
//!
//! The stock registry over an in-memory ledger laid out at the real
//! Polygon factory, deployer and quoter addresses.

use std::sync::Arc;

use amm::v3_math::sqrt_ratio_at_tick;
use amm::V3PoolState;
use arbitrage_scanner::{Address, ArbitrageScanner, EncodedExchange, InMemoryLedger, U256};
use dex::{ALGEBRA_INIT_CODE_HASH, UNISWAP_V2_INIT_CODE_HASH, UNISWAP_V3_INIT_CODE_HASH};
use scanner_config::polygon::{dex_ids, quickswap_v2, quickswap_v3, tokens, uniswap_v3};
use scanner_config::ScannerConfig;

fn address(value: &str) -> Address {
    value.parse().unwrap()
}

fn units(whole: u64, decimals: usize) -> U256 {
    U256::from(whole) * U256::exp10(decimals)
}

fn scanner_exchange(dex_id: u8, fee: u32) -> EncodedExchange {
    EncodedExchange::new(dex_id, fee).unwrap()
}

fn deep_pool(fee: u32, tick: i32) -> V3PoolState {
    let base = (tick / 60) * 60;
    V3PoolState::new(sqrt_ratio_at_tick(tick).unwrap(), fee, 60)
        .unwrap()
        .with_position(base - 30_000, base + 30_000, 10u128.pow(15))
        .unwrap()
}

/// - USDT/USDC.e pair on QuickSwap V2
/// - WBTC/USDT Algebra pool on QuickSwap V3, about 65,000 USDT per WBTC
/// - USDT/USDC.e pool on Uniswap V3 at 500 pips
fn polygon_ledger() -> Arc<InMemoryLedger> {
    let ledger = InMemoryLedger::new();
    for (token, decimals) in [
        (tokens::WBTC, 8),
        (tokens::USDC, 6),
        (tokens::USDT, 6),
        (tokens::USDCE, 6),
        (tokens::WMATIC, 18),
        (tokens::WETH, 18),
    ] {
        ledger.set_decimals(address(token), decimals);
    }

    let quickswap_factory = address(quickswap_v2::FACTORY);
    ledger.register_factory(quickswap_factory);
    ledger.deploy_pair(
        quickswap_factory,
        UNISWAP_V2_INIT_CODE_HASH,
        address(tokens::USDT),
        address(tokens::USDCE),
        units(5_000_000, 6),
        units(5_000_000, 6),
    );

    let deployer = address(quickswap_v3::POOL_DEPLOYER);
    ledger.register_algebra_quoter(address(quickswap_v3::QUOTER), deployer, ALGEBRA_INIT_CODE_HASH);
    ledger.deploy_algebra_pool(
        deployer,
        ALGEBRA_INIT_CODE_HASH,
        address(tokens::WBTC),
        address(tokens::USDT),
        deep_pool(900, 64_770),
    );

    let uniswap_factory = address(uniswap_v3::FACTORY);
    ledger.register_quoter(address(uniswap_v3::QUOTER), uniswap_factory, UNISWAP_V3_INIT_CODE_HASH);
    ledger.deploy_concentrated_pool(
        uniswap_factory,
        UNISWAP_V3_INIT_CODE_HASH,
        address(tokens::USDT),
        address(tokens::USDCE),
        deep_pool(500, 0),
    );

    Arc::new(ledger)
}

fn default_scanner(ledger: Arc<InMemoryLedger>) -> ArbitrageScanner {
    ArbitrageScanner::from_config(&ScannerConfig::default(), ledger).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_quickswap_v2_accepts_its_fee_encoding() {
    let scanner = default_scanner(polygon_ledger());
    let (usdt, usdce) = (address(tokens::USDT), address(tokens::USDCE));

    let implicit = scanner
        .get_exchange_rate(usdt, usdce, units(10, 6), scanner_exchange(dex_ids::QUICKSWAP_V2, 0))
        .await
        .unwrap();
    assert!(implicit.has_liquidity());

    for fee in [quickswap_v2::FEE_BPS, 30] {
        let quote = scanner
            .get_exchange_rate(usdt, usdce, units(10, 6), scanner_exchange(dex_ids::QUICKSWAP_V2, fee))
            .await
            .unwrap();
        assert_eq!(quote, implicit, "fee {fee}");
    }

    // Round trip across both families with the usual encodings
    let amount_out = scanner
        .simulate_trade(
            &[usdt, usdce, usdt],
            &[
                scanner_exchange(dex_ids::QUICKSWAP_V2, 25),
                scanner_exchange(dex_ids::UNISWAP_V3, 500),
            ],
            units(1_000, 6),
        )
        .await
        .unwrap();
    assert!(amount_out > U256::zero());
    assert!(amount_out < units(1_000, 6));
}

#[test_log::test(tokio::test)]
async fn test_validate_over_quickswap_and_uniswap() {
    let scanner = default_scanner(polygon_ledger());
    let all_dexes = [dex_ids::QUICKSWAP_V2, dex_ids::QUICKSWAP_V3, dex_ids::UNISWAP_V3];
    let (wbtc, usdt) = (address(tokens::WBTC), address(tokens::USDT));

    let validated = scanner
        .validate_tokens(&[wbtc], &all_dexes, &[usdt], &[units(10_000, 6)], &[50])
        .await
        .unwrap();
    assert_eq!(validated, vec![wbtc]);

    // Default references end with USDT at 10,000 units and 50 bps
    let validated = scanner
        .validate_with_references(&[wbtc, address(tokens::LINK)], &all_dexes)
        .await
        .unwrap();
    assert_eq!(validated, vec![wbtc, Address::zero()]);

    let rates = scanner
        .get_multiple_exchange_rates_both(
            wbtc,
            units(1, 7),
            &[usdt],
            &[units(65_000, 6)],
            &[
                scanner_exchange(dex_ids::QUICKSWAP_V2, 25),
                scanner_exchange(dex_ids::QUICKSWAP_V3, 0),
                scanner_exchange(dex_ids::UNISWAP_V3, 3000),
            ],
        )
        .await
        .unwrap();
    let live: Vec<bool> = rates.pools.iter().map(|pool| !pool.is_zero()).collect();
    assert_eq!(live, vec![false, true, false]);
}
