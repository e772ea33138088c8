//! secp256k1 key operations for hex (EVM-style) addresses

use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug)]
pub enum Secp256k1Error {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// A secp256k1 keypair for ECDSA operations
#[derive(Clone)]
pub struct Secp256k1Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Secp256k1Keypair {
    /// Generate a new random keypair from the OS randomness source
    pub fn generate() -> Result<Self, Secp256k1Error> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        loop {
            OsRng
                .try_fill_bytes(bytes.as_mut_slice())
                .map_err(|e| Secp256k1Error::RandomnessUnavailable(e.to_string()))?;
            // Zero or >= the group order; draw again.
            if let Ok(keypair) = Self::from_bytes(&bytes) {
                return Ok(keypair);
            }
        }
    }

    /// Create from raw 32-byte private key
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let secret_key =
            SecretKey::from_slice(bytes).map_err(|_| Secp256k1Error::InvalidPrivateKey)?;
        let public_key = secret_key.public_key();
        Ok(Self { secret_key, public_key })
    }

    /// Get the private key as bytes
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret_key.to_bytes().into())
    }

    /// Get the uncompressed public key (65 bytes: 0x04 || x || y)
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        let point = self.public_key.to_encoded_point(false);
        let mut result = [0u8; 65];
        result.copy_from_slice(point.as_bytes());
        result
    }

    /// Get just the X and Y coordinates (64 bytes, no prefix)
    pub fn public_key_xy(&self) -> [u8; 64] {
        let uncompressed = self.public_key_uncompressed();
        let mut result = [0u8; 64];
        result.copy_from_slice(&uncompressed[1..65]);
        result
    }
}
