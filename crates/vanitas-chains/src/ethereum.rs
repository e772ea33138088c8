//! Hex variant (EVM-style)
//!
//! secp256k1 + Keccak-256(pubkey[1..65]) last 20 bytes, rendered as `0x` +
//! lowercase hex. Matching only ever sees the 40-character body.

use crate::traits::{GenerationError, KeyGenerator, KeypairRecord, Variant};
use vanitas_crypto::zeroize::Zeroizing;
use vanitas_crypto::{hash::keccak256, hex, Secp256k1Keypair};

/// EVM key generator
#[derive(Debug, Clone, Copy, Default)]
pub struct Ethereum;

impl KeyGenerator for Ethereum {
    fn variant(&self) -> Variant {
        Variant::Hex
    }

    fn name(&self) -> &'static str {
        "Ethereum (hex)"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        let keypair = Secp256k1Keypair::generate()?;
        Ok(self.record_from_keypair(&keypair))
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        let bytes: &[u8; 32] = private_key.try_into().map_err(|_| {
            GenerationError::InvalidKeyMaterial(format!(
                "expected 32 bytes, got {}",
                private_key.len()
            ))
        })?;
        let keypair = Secp256k1Keypair::from_bytes(bytes)?;
        Ok(self.record_from_keypair(&keypair))
    }
}

impl Ethereum {
    fn record_from_keypair(&self, keypair: &Secp256k1Keypair) -> KeypairRecord {
        KeypairRecord {
            public_identifier: format!("0x{}", hex::encode(address_bytes(keypair))),
            private_material: Zeroizing::new(keypair.private_key_bytes().to_vec()),
            variant: Variant::Hex,
        }
    }
}

/// Last 20 bytes of keccak256(uncompressed_pubkey[1..65])
pub fn address_bytes(keypair: &Secp256k1Keypair) -> [u8; 20] {
    let hash = keccak256(&keypair.public_key_xy());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eth_generation() {
        let record = Ethereum.generate().unwrap();
        assert!(record.public_identifier.starts_with("0x"));
        assert_eq!(record.public_identifier.len(), 42);
        assert_eq!(record.address_body().len(), 40);
        assert!(record
            .address_body()
            .chars()
            .all(|c| Ethereum.valid_address_chars().contains(c)));
        assert_eq!(record.private_material.len(), 32);
    }

    #[test]
    fn test_known_vector() {
        // Private key = 1
        let privkey =
            hex::decode("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        let record = Ethereum.from_private_bytes(&privkey).unwrap();

        assert_eq!(
            record.public_identifier,
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            Ethereum.from_private_bytes(&[1u8; 64]),
            Err(GenerationError::InvalidKeyMaterial(_))
        ));
    }
}
