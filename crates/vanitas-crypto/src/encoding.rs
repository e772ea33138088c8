//! Text encodings: Base58, Base64, EIP-55 hex

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Invalid Base58 input: {0}")]
    Base58(String),
    #[error("Invalid Base64 input: {0}")]
    Base64(String),
}

/// Base58 encode (Solana style, no checksum)
pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Base58 decode
pub fn base58_decode(input: &str) -> Result<Vec<u8>, EncodingError> {
    bs58::decode(input)
        .into_vec()
        .map_err(|e| EncodingError::Base58(e.to_string()))
}

/// Standard Base64 with padding
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Standard Base64 decode
pub fn base64_decode(input: &str) -> Result<Vec<u8>, EncodingError> {
    BASE64
        .decode(input)
        .map_err(|e| EncodingError::Base64(e.to_string()))
}

/// EIP-55 checksum encoding for Ethereum addresses
pub fn eip55_checksum(address: &[u8; 20]) -> String {
    use crate::hash::keccak256;

    let hex_addr = hex::encode(address);
    let hash = keccak256(hex_addr.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in hex_addr.chars().enumerate() {
        let hash_nibble = if i % 2 == 0 {
            (hash[i / 2] >> 4) & 0x0F
        } else {
            hash[i / 2] & 0x0F
        };

        if hash_nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}
