//! Typed calldata encoders and return-data decoders
//!
//! Each pair builds calldata for one contract read and turns the raw
//! `eth_call` result back into typed values, rejecting malformed output.

use ethabi::{Function, Token};
use ethereum_types::{Address, U256};
use once_cell::sync::Lazy;

use super::{algebra, erc20, token_function, uniswap_v2, uniswap_v3};
use crate::error::{DexError, Result};

pub static TOKEN0: Lazy<Function> = Lazy::new(|| token_function(0));
pub static TOKEN1: Lazy<Function> = Lazy::new(|| token_function(1));
pub static GET_RESERVES: Lazy<Function> = Lazy::new(uniswap_v2::get_reserves_function);
pub static ALL_PAIRS_LENGTH: Lazy<Function> = Lazy::new(uniswap_v2::all_pairs_length_function);
pub static ALL_PAIRS: Lazy<Function> = Lazy::new(uniswap_v2::all_pairs_function);
pub static SLOT0: Lazy<Function> = Lazy::new(uniswap_v3::slot0_function);
pub static LIQUIDITY: Lazy<Function> = Lazy::new(uniswap_v3::liquidity_function);
pub static FEE: Lazy<Function> = Lazy::new(uniswap_v3::fee_function);
pub static QUOTE_EXACT_INPUT_SINGLE: Lazy<Function> =
    Lazy::new(uniswap_v3::quote_exact_input_single_function);
pub static GLOBAL_STATE: Lazy<Function> = Lazy::new(algebra::global_state_function);
pub static ALGEBRA_QUOTE_EXACT_INPUT_SINGLE: Lazy<Function> =
    Lazy::new(algebra::quote_exact_input_single_function);
pub static DECIMALS: Lazy<Function> = Lazy::new(erc20::decimals_function);

/// Constant-product pair reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_timestamp_last: u32,
}

/// Concentrated-liquidity pool price slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub unlocked: bool,
}

/// Algebra pool price slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// Current dynamic fee in pips
    pub fee: u32,
    pub unlocked: bool,
}

fn decode(function: &Function, data: &[u8]) -> Result<Vec<Token>> {
    function.decode_output(data).map_err(|e| DexError::Decoding {
        call: function.name.clone(),
        reason: e.to_string(),
    })
}

fn unexpected(function: &Function, tokens: &[Token]) -> DexError {
    DexError::Decoding {
        call: function.name.clone(),
        reason: format!("unexpected output tokens {tokens:?}"),
    }
}

fn encode(function: &Function, inputs: &[Token]) -> Result<Vec<u8>> {
    function.encode_input(inputs).map_err(|e| DexError::Encoding {
        call: function.name.clone(),
        reason: e.to_string(),
    })
}

/// Calldata for a no-argument read
pub fn encode_call(function: &Function) -> Result<Vec<u8>> {
    encode(function, &[])
}

pub fn encode_all_pairs(index: u64) -> Result<Vec<u8>> {
    encode(&ALL_PAIRS, &[Token::Uint(U256::from(index))])
}

/// QuoterV1 calldata with no price limit
pub fn encode_quote_exact_input_single(
    token_in: Address,
    token_out: Address,
    fee: u32,
    amount_in: U256,
) -> Result<Vec<u8>> {
    encode(
        &QUOTE_EXACT_INPUT_SINGLE,
        &[
            Token::Address(token_in),
            Token::Address(token_out),
            Token::Uint(U256::from(fee)),
            Token::Uint(amount_in),
            Token::Uint(U256::zero()),
        ],
    )
}

/// Algebra quoter calldata with no price limit
pub fn encode_algebra_quote_exact_input_single(
    token_in: Address,
    token_out: Address,
    amount_in: U256,
) -> Result<Vec<u8>> {
    encode(
        &ALGEBRA_QUOTE_EXACT_INPUT_SINGLE,
        &[
            Token::Address(token_in),
            Token::Address(token_out),
            Token::Uint(amount_in),
            Token::Uint(U256::zero()),
        ],
    )
}

/// Decodes a single `address` return
pub fn decode_address(function: &Function, data: &[u8]) -> Result<Address> {
    let tokens = decode(function, data)?;
    match tokens.as_slice() {
        [Token::Address(address)] => Ok(*address),
        other => Err(unexpected(function, other)),
    }
}

/// Decodes a single unsigned integer return
pub fn decode_uint(function: &Function, data: &[u8]) -> Result<U256> {
    let tokens = decode(function, data)?;
    match tokens.as_slice() {
        [Token::Uint(value)] => Ok(*value),
        other => Err(unexpected(function, other)),
    }
}

pub fn decode_reserves(data: &[u8]) -> Result<Reserves> {
    let tokens = decode(&GET_RESERVES, data)?;
    match tokens.as_slice() {
        [Token::Uint(reserve0), Token::Uint(reserve1), Token::Uint(timestamp)] => Ok(Reserves {
            reserve0: *reserve0,
            reserve1: *reserve1,
            block_timestamp_last: timestamp.low_u32(),
        }),
        other => Err(unexpected(&GET_RESERVES, other)),
    }
}

pub fn decode_slot0(data: &[u8]) -> Result<Slot0> {
    let tokens = decode(&SLOT0, data)?;
    match tokens.as_slice() {
        [Token::Uint(sqrt_price_x96), Token::Int(tick), _, _, _, _, Token::Bool(unlocked)] => {
            Ok(Slot0 {
                sqrt_price_x96: *sqrt_price_x96,
                // int24 is sign-extended to 256 bits, the low word carries the value
                tick: tick.low_u32() as i32,
                unlocked: *unlocked,
            })
        }
        other => Err(unexpected(&SLOT0, other)),
    }
}

pub fn decode_global_state(data: &[u8]) -> Result<GlobalState> {
    let tokens = decode(&GLOBAL_STATE, data)?;
    match tokens.as_slice() {
        [Token::Uint(price), Token::Int(tick), Token::Uint(fee), _, _, _, Token::Bool(unlocked)] => {
            Ok(GlobalState {
                sqrt_price_x96: *price,
                tick: tick.low_u32() as i32,
                fee: fee.low_u32(),
                unlocked: *unlocked,
            })
        }
        other => Err(unexpected(&GLOBAL_STATE, other)),
    }
}

/// Amount out of an Algebra quote; the charged fee is dropped
pub fn decode_algebra_quote(data: &[u8]) -> Result<U256> {
    let tokens = decode(&ALGEBRA_QUOTE_EXACT_INPUT_SINGLE, data)?;
    match tokens.as_slice() {
        [Token::Uint(amount_out), Token::Uint(_fee)] => Ok(*amount_out),
        other => Err(unexpected(&ALGEBRA_QUOTE_EXACT_INPUT_SINGLE, other)),
    }
}

pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    let value = decode_uint(&DECIMALS, data)?;
    if value > U256::from(u8::MAX) {
        return Err(DexError::Decoding {
            call: DECIMALS.name.clone(),
            reason: format!("decimals {value} out of range"),
        });
    }
    Ok(value.low_u32() as u8)
}
