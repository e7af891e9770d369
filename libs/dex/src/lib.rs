//! Shared DEX protocol library
//!
//! Protocol-level building blocks shared by every component that talks to a
//! dex: the packed exchange identifier, protocol families, deterministic pool
//! addresses and the call ABIs used to read pool state.
//!
//! # Architecture
//!
//! ```text
//! libs/dex/
//! ├── abi/             # Call ABIs, calldata encoders and typed decoders
//! ├── codec.rs         # (dex id, fee) <-> u32
//! ├── pool_address.rs  # CREATE2 pair/pool addresses
//! └── protocol.rs      # Protocol families and init code hashes
//! ```

pub mod abi;
pub mod codec;
pub mod error;
pub mod pool_address;
pub mod protocol;

pub use codec::{decode_dex_fee, encode_dex_fee, EncodedExchange, MAX_FEE};
pub use error::{DexError, Result};
pub use pool_address::{
    algebra_pool_address, concentrated_pool_address, constant_product_pair_address, sort_tokens,
};
pub use protocol::{
    DexProtocol, ALGEBRA_INIT_CODE_HASH, SUSHISWAP_INIT_CODE_HASH, UNISWAP_V2_INIT_CODE_HASH,
    UNISWAP_V3_INIT_CODE_HASH,
};

pub use ethereum_types::{Address, H256, U256};
