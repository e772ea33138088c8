//! Vanitas Address Generators
//!
//! Trait-based abstraction over the two supported address variants:
//! Base58 (Ed25519, Solana-style) and hex (secp256k1, EVM-style).

pub mod traits;
pub mod extract;

// Variant adapters
pub mod ethereum;
pub mod solana;

use std::sync::Arc;

// Re-exports
pub use extract::{extract, parse_private_key, ExtractedKey, PrivateKeyEncodings};
pub use traits::{
    GenerationError, KeyGenerator, KeypairRecord, UnsupportedVariant, Variant, BASE58_ALPHABET,
    HEX_ALPHABET,
};

pub use ethereum::Ethereum;
pub use solana::Solana;

/// Get all built-in generators
pub fn all_generators() -> Vec<Arc<dyn KeyGenerator>> {
    Variant::ALL.iter().map(|v| generator_for(*v)).collect()
}

/// Get the built-in generator for a variant
pub fn generator_for(variant: Variant) -> Arc<dyn KeyGenerator> {
    match variant {
        Variant::Base58 => Arc::new(Solana),
        Variant::Hex => Arc::new(Ethereum),
    }
}

/// Get a generator by tag ("base58", "sol", "hex", "eth", ...)
pub fn get_generator(tag: &str) -> Result<Arc<dyn KeyGenerator>, UnsupportedVariant> {
    tag.parse::<Variant>().map(generator_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_lookup() {
        assert_eq!(get_generator("sol").unwrap().variant(), Variant::Base58);
        assert_eq!(get_generator("HEX").unwrap().variant(), Variant::Hex);
        assert!(get_generator("ton").is_err());
        assert_eq!(all_generators().len(), 2);
    }
}
