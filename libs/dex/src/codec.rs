//! Packed (dex id, fee) exchange identifiers
//!
//! Batch APIs address a market with one `u32`: the dex id in the high 8 bits
//! and the fee in the low 24 bits. 24 bits covers every fee tier expressed in
//! pips (1_000_000 = 100%).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DexError, Result};

/// Width of the fee field
pub const FEE_BITS: u32 = 24;
/// Largest encodable fee
pub const MAX_FEE: u32 = (1 << FEE_BITS) - 1;

/// A dex id and fee tier packed into one integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedExchange(u32);

impl EncodedExchange {
    pub fn new(dex_id: u8, fee: u32) -> Result<Self> {
        if fee > MAX_FEE {
            return Err(DexError::FeeOutOfRange { fee, max: MAX_FEE });
        }
        Ok(Self((u32::from(dex_id) << FEE_BITS) | fee))
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn dex_id(self) -> u8 {
        (self.0 >> FEE_BITS) as u8
    }

    pub const fn fee(self) -> u32 {
        self.0 & MAX_FEE
    }

    pub const fn decode(self) -> (u8, u32) {
        (self.dex_id(), self.fee())
    }
}

impl From<u32> for EncodedExchange {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<EncodedExchange> for u32 {
    fn from(exchange: EncodedExchange) -> Self {
        exchange.0
    }
}

impl fmt::Display for EncodedExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dex {} fee {}", self.dex_id(), self.fee())
    }
}

/// Packs `dex_id` and `fee`; fails when `fee` needs more than 24 bits
pub fn encode_dex_fee(dex_id: u8, fee: u32) -> Result<u32> {
    EncodedExchange::new(dex_id, fee).map(EncodedExchange::raw)
}

/// Exact inverse of [`encode_dex_fee`]
pub fn decode_dex_fee(packed: u32) -> (u8, u32) {
    EncodedExchange::from_raw(packed).decode()
}
