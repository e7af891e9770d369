//! Algebra (QuickSwap V3) pool and quoter call ABIs

use ethabi::{Function, ParamType, StateMutability};

use super::{function, param};

/// function globalState() view returns (uint160 price, int24 tick, uint16 fee,
/// uint16 timepointIndex, uint8 communityFeeToken0, uint8 communityFeeToken1, bool unlocked)
pub fn global_state_function() -> Function {
    function(
        "globalState",
        vec![],
        vec![
            param("price", ParamType::Uint(160)),
            param("tick", ParamType::Int(24)),
            param("fee", ParamType::Uint(16)),
            param("timepointIndex", ParamType::Uint(16)),
            param("communityFeeToken0", ParamType::Uint(8)),
            param("communityFeeToken1", ParamType::Uint(8)),
            param("unlocked", ParamType::Bool),
        ],
        StateMutability::View,
    )
}

/// function quoteExactInputSingle(address tokenIn, address tokenOut, uint256 amountIn,
/// uint160 limitSqrtPrice) returns (uint256 amountOut, uint16 fee)
///
/// The pool is found from the pair alone; the returned fee is the dynamic
/// fee the swap was charged.
pub fn quote_exact_input_single_function() -> Function {
    function(
        "quoteExactInputSingle",
        vec![
            param("tokenIn", ParamType::Address),
            param("tokenOut", ParamType::Address),
            param("amountIn", ParamType::Uint(256)),
            param("limitSqrtPrice", ParamType::Uint(160)),
        ],
        vec![
            param("amountOut", ParamType::Uint(256)),
            param("fee", ParamType::Uint(16)),
        ],
        StateMutability::NonPayable,
    )
}
