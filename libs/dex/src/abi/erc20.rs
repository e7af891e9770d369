//! ERC-20 metadata ABIs

use ethabi::{Function, ParamType, StateMutability};

use super::{function, param};

/// function decimals() view returns (uint8)
pub fn decimals_function() -> Function {
    function(
        "decimals",
        vec![],
        vec![param("", ParamType::Uint(8))],
        StateMutability::View,
    )
}
