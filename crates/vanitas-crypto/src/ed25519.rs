//! Ed25519 key operations for Base58 (Solana-style) addresses

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug)]
pub enum Ed25519Error {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Keypair bytes do not match the embedded public key")]
    KeypairMismatch,
    #[error("Randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// An Ed25519 keypair
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a new random keypair from the OS randomness source
    pub fn generate() -> Result<Self, Ed25519Error> {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng
            .try_fill_bytes(seed.as_mut_slice())
            .map_err(|e| Ed25519Error::RandomnessUnavailable(e.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Create from raw 32-byte seed (private key)
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create from the 64-byte `seed || public key` layout.
    ///
    /// Fails when the trailing public key was not derived from the seed.
    pub fn from_keypair_bytes(bytes: &[u8; 64]) -> Result<Self, Ed25519Error> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| Ed25519Error::KeypairMismatch)?;
        Ok(Self { signing_key })
    }

    /// Create from either a 32-byte seed or a 64-byte keypair
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Ed25519Error> {
        match bytes.len() {
            32 => {
                let mut seed = Zeroizing::new([0u8; 32]);
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed))
            }
            64 => {
                let mut keypair = Zeroizing::new([0u8; 64]);
                keypair.copy_from_slice(bytes);
                Self::from_keypair_bytes(&keypair)
            }
            _ => Err(Ed25519Error::InvalidPrivateKey),
        }
    }

    /// Get the private key seed as bytes (32 bytes)
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Get the full keypair bytes (64 bytes: privkey || pubkey) - Solana format
    pub fn keypair_bytes(&self) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Get the public key as bytes (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}
