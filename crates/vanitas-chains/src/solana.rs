//! Base58 variant (Solana-style)
//!
//! Address = Base58(ed25519 public key). Private material is the 64-byte
//! `seed || public key` keypair.

use crate::traits::{GenerationError, KeyGenerator, KeypairRecord, Variant};
use vanitas_crypto::zeroize::Zeroizing;
use vanitas_crypto::{encoding::base58_encode, Ed25519Keypair};

/// Solana key generator
#[derive(Debug, Clone, Copy, Default)]
pub struct Solana;

impl KeyGenerator for Solana {
    fn variant(&self) -> Variant {
        Variant::Base58
    }

    fn name(&self) -> &'static str {
        "Solana (Base58)"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        let keypair = Ed25519Keypair::generate()?;
        Ok(self.record_from_keypair(&keypair))
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        let keypair = Ed25519Keypair::from_slice(private_key)?;
        Ok(self.record_from_keypair(&keypair))
    }
}

impl Solana {
    fn record_from_keypair(&self, keypair: &Ed25519Keypair) -> KeypairRecord {
        KeypairRecord {
            public_identifier: base58_encode(&keypair.public_key_bytes()),
            private_material: Zeroizing::new(keypair.keypair_bytes().to_vec()),
            variant: Variant::Base58,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_generation() {
        let record = Solana.generate().unwrap();

        // 32-byte keys encode to 32-44 Base58 symbols
        let len = record.public_identifier.len();
        assert!((32..=44).contains(&len));
        for c in record.public_identifier.chars() {
            assert!(Solana.valid_address_chars().contains(c));
        }
        assert_eq!(record.private_material.len(), 64);
        assert_eq!(record.variant, Variant::Base58);
    }

    #[test]
    fn test_deterministic() {
        let seed = [42u8; 32];
        let a = Solana.from_private_bytes(&seed).unwrap();
        let b = Solana.from_private_bytes(&seed).unwrap();
        assert_eq!(a.public_identifier, b.public_identifier);

        // The 64-byte layout round-trips to the same address
        let c = Solana.from_private_bytes(&a.private_material).unwrap();
        assert_eq!(c.public_identifier, a.public_identifier);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            Solana.from_private_bytes(&[1u8; 20]),
            Err(GenerationError::InvalidKeyMaterial(_))
        ));
    }
}
