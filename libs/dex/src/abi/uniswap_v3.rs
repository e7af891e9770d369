//! Uniswap V3 pool and quoter call ABIs

use ethabi::{Function, ParamType, StateMutability};

use super::{function, param};

/// function slot0() view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex,
/// uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked)
pub fn slot0_function() -> Function {
    function(
        "slot0",
        vec![],
        vec![
            param("sqrtPriceX96", ParamType::Uint(160)),
            param("tick", ParamType::Int(24)),
            param("observationIndex", ParamType::Uint(16)),
            param("observationCardinality", ParamType::Uint(16)),
            param("observationCardinalityNext", ParamType::Uint(16)),
            param("feeProtocol", ParamType::Uint(8)),
            param("unlocked", ParamType::Bool),
        ],
        StateMutability::View,
    )
}

/// function liquidity() view returns (uint128)
pub fn liquidity_function() -> Function {
    function(
        "liquidity",
        vec![],
        vec![param("", ParamType::Uint(128))],
        StateMutability::View,
    )
}

/// function fee() view returns (uint24)
pub fn fee_function() -> Function {
    function(
        "fee",
        vec![],
        vec![param("", ParamType::Uint(24))],
        StateMutability::View,
    )
}

/// QuoterV1: function quoteExactInputSingle(address tokenIn, address tokenOut, uint24 fee,
/// uint256 amountIn, uint160 sqrtPriceLimitX96) returns (uint256 amountOut)
///
/// Not a view function on-chain (it reverts internally to return the
/// result) but safe to `eth_call`.
pub fn quote_exact_input_single_function() -> Function {
    function(
        "quoteExactInputSingle",
        vec![
            param("tokenIn", ParamType::Address),
            param("tokenOut", ParamType::Address),
            param("fee", ParamType::Uint(24)),
            param("amountIn", ParamType::Uint(256)),
            param("sqrtPriceLimitX96", ParamType::Uint(160)),
        ],
        vec![param("amountOut", ParamType::Uint(256))],
        StateMutability::NonPayable,
    )
}
