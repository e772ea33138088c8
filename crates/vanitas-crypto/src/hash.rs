//! Hash functions for address derivation

use sha3::{Digest, Keccak256};

/// Keccak-256 (used in Ethereum, NOT SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
