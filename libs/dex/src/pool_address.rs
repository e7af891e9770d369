//! Deterministic (CREATE2) pool addresses
//!
//! Factories deploy pools with CREATE2, so a pool's address follows from the
//! factory, a salt derived from the sorted tokens (plus the fee for
//! concentrated-liquidity pools) and the pool's init code hash:
//!
//! `keccak256(0xff ++ deployer ++ salt ++ init_code_hash)[12..]`

use ethabi::Token;
use ethereum_types::{Address, H256};
use sha3::{Digest, Keccak256};

pub fn keccak256(bytes: &[u8]) -> H256 {
    H256::from_slice(&Keccak256::digest(bytes))
}

/// Canonical pool ordering: lower address first
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

pub fn create2_address(deployer: Address, salt: H256, init_code_hash: H256) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt.as_bytes());
    preimage[53..85].copy_from_slice(init_code_hash.as_bytes());
    Address::from_slice(&keccak256(&preimage)[12..])
}

/// Pair address of a constant-product factory
///
/// salt = `keccak256(abi.encodePacked(token0, token1))`
pub fn constant_product_pair_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    init_code_hash: H256,
) -> Address {
    let (token0, token1) = sort_tokens(token_a, token_b);
    let mut packed = [0u8; 40];
    packed[..20].copy_from_slice(token0.as_bytes());
    packed[20..].copy_from_slice(token1.as_bytes());
    create2_address(factory, keccak256(&packed), init_code_hash)
}

/// Pool address of a concentrated-liquidity factory
///
/// salt = `keccak256(abi.encode(token0, token1, uint24 fee))`
pub fn concentrated_pool_address(
    deployer: Address,
    token_a: Address,
    token_b: Address,
    fee: u32,
    init_code_hash: H256,
) -> Address {
    let (token0, token1) = sort_tokens(token_a, token_b);
    let encoded = ethabi::encode(&[
        Token::Address(token0),
        Token::Address(token1),
        Token::Uint(fee.into()),
    ]);
    create2_address(deployer, keccak256(&encoded), init_code_hash)
}

/// Pool address of an Algebra pool deployer
///
/// One pool per pair, so the salt carries no fee:
/// salt = `keccak256(abi.encode(token0, token1))`
pub fn algebra_pool_address(
    deployer: Address,
    token_a: Address,
    token_b: Address,
    init_code_hash: H256,
) -> Address {
    let (token0, token1) = sort_tokens(token_a, token_b);
    let encoded = ethabi::encode(&[Token::Address(token0), Token::Address(token1)]);
    create2_address(deployer, keccak256(&encoded), init_code_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            format!("{:x}", keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_sort_tokens() {
        let low = Address::from_low_u64_be(1);
        let high = Address::from_low_u64_be(2);
        assert_eq!(sort_tokens(high, low), (low, high));
        assert_eq!(sort_tokens(low, high), (low, high));
    }

    #[test]
    fn test_algebra_salt_has_no_fee() {
        let deployer = Address::from_low_u64_be(0xde);
        let low = Address::from_low_u64_be(1);
        let high = Address::from_low_u64_be(2);
        let hash = crate::ALGEBRA_INIT_CODE_HASH;

        let pool = algebra_pool_address(deployer, high, low, hash);
        assert_eq!(pool, algebra_pool_address(deployer, low, high, hash));

        let mut encoded = [0u8; 64];
        encoded[12..32].copy_from_slice(low.as_bytes());
        encoded[44..64].copy_from_slice(high.as_bytes());
        assert_eq!(pool, create2_address(deployer, keccak256(&encoded), hash));
        assert_ne!(pool, concentrated_pool_address(deployer, low, high, 0, hash));
    }
}
