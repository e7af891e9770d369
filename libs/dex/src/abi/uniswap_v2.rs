//! Uniswap V2 and compatible protocol call ABIs
//!
//! Covers Uniswap V2 and its forks (SushiSwap, QuickSwap V2), which share
//! the pair and factory interfaces.

use ethabi::{Function, ParamType, StateMutability};

use super::{function, param};

/// function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
pub fn get_reserves_function() -> Function {
    function(
        "getReserves",
        vec![],
        vec![
            param("reserve0", ParamType::Uint(112)),
            param("reserve1", ParamType::Uint(112)),
            param("blockTimestampLast", ParamType::Uint(32)),
        ],
        StateMutability::View,
    )
}

/// function allPairsLength() view returns (uint256)
pub fn all_pairs_length_function() -> Function {
    function(
        "allPairsLength",
        vec![],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    )
}

/// function allPairs(uint256) view returns (address pair)
pub fn all_pairs_function() -> Function {
    function(
        "allPairs",
        vec![param("", ParamType::Uint(256))],
        vec![param("pair", ParamType::Address)],
        StateMutability::View,
    )
}
