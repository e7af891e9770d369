//! Call ABIs for the contracts the scanner reads
//!
//! Definitions are built by hand with `ethabi` rather than parsed from JSON
//! so every selector is visible in code.
//!
//! # Supported Contracts
//! - Uniswap V2 pairs and factories (and forks: SushiSwap, QuickSwap V2)
//! - Uniswap V3 pools and QuoterV1
//! - Algebra pools and quoter (QuickSwap V3)
//! - ERC-20 metadata

pub mod algebra;
pub mod calls;
pub mod erc20;
pub mod uniswap_v2;
pub mod uniswap_v3;

use ethabi::{Function, Param, ParamType, StateMutability};

pub use calls::{GlobalState, Reserves, Slot0};

pub(crate) fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

#[allow(deprecated)]
pub(crate) fn function(
    name: &str,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability,
    }
}

/// `token0()` / `token1()`, shared by V2 pairs and V3 pools
pub fn token_function(index: u8) -> Function {
    let name = if index == 0 { "token0" } else { "token1" };
    function(
        name,
        vec![],
        vec![param("", ParamType::Address)],
        StateMutability::View,
    )
}
