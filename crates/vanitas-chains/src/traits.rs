//! Key generator trait and types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanitas_crypto::zeroize::Zeroizing;
use vanitas_crypto::{Ed25519Error, Secp256k1Error};

/// Base58 alphabet (Bitcoin/Solana ordering, no `0`, `O`, `I`, `l`)
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Lowercase hex alphabet used by the address body
pub const HEX_ALPHABET: &str = "0123456789abcdef";

/// Failure of the key generation backend. Fatal for the current search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
}

impl From<Ed25519Error> for GenerationError {
    fn from(e: Ed25519Error) -> Self {
        match e {
            Ed25519Error::RandomnessUnavailable(msg) => GenerationError::RandomnessUnavailable(msg),
            other => GenerationError::InvalidKeyMaterial(other.to_string()),
        }
    }
}

impl From<Secp256k1Error> for GenerationError {
    fn from(e: Secp256k1Error) -> Self {
        match e {
            Secp256k1Error::RandomnessUnavailable(msg) => {
                GenerationError::RandomnessUnavailable(msg)
            }
            other => GenerationError::InvalidKeyMaterial(other.to_string()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported address variant: {0}")]
pub struct UnsupportedVariant(pub String);

/// Address encoding + derivation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Ed25519 public key, Base58 encoded
    Base58,
    /// secp256k1 + Keccak-256, 20-byte address as `0x` + lowercase hex
    Hex,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Base58, Variant::Hex];

    /// Characters an address body may contain
    pub fn alphabet(self) -> &'static str {
        match self {
            Variant::Base58 => BASE58_ALPHABET,
            Variant::Hex => HEX_ALPHABET,
        }
    }

    /// Canonical prefix that is never part of matching
    pub fn address_prefix(self) -> &'static str {
        match self {
            Variant::Base58 => "",
            Variant::Hex => "0x",
        }
    }

    /// Nominal body length. A 32-byte key encodes to 43 or 44 Base58 symbols.
    pub fn address_body_len(self) -> usize {
        match self {
            Variant::Base58 => 44,
            Variant::Hex => 40,
        }
    }

    /// Single-thread keys/second used for duration estimates
    pub fn throughput_per_second(self) -> u64 {
        match self {
            Variant::Base58 => 25_000,
            Variant::Hex => 10_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Base58 => "base58",
            Variant::Hex => "hex",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = UnsupportedVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base58" | "solana" | "sol" => Ok(Variant::Base58),
            "hex" | "evm" | "eth" | "ethereum" => Ok(Variant::Hex),
            _ => Err(UnsupportedVariant(s.to_string())),
        }
    }
}

/// A generated keypair with its public address
#[derive(Clone)]
pub struct KeypairRecord {
    /// Address as displayed (Hex includes the `0x` prefix)
    pub public_identifier: String,
    /// Secret key material, zeroized on drop
    pub private_material: Zeroizing<Vec<u8>>,
    /// Variant that produced the record
    pub variant: Variant,
}

impl KeypairRecord {
    /// Address with the canonical prefix removed
    pub fn address_body(&self) -> &str {
        self.public_identifier
            .strip_prefix(self.variant.address_prefix())
            .unwrap_or(&self.public_identifier)
    }
}

impl fmt::Debug for KeypairRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairRecord")
            .field("public_identifier", &self.public_identifier)
            .field("private_material", &"<redacted>")
            .field("variant", &self.variant)
            .finish()
    }
}

/// Trait for address generators
pub trait KeyGenerator: Send + Sync {
    /// Variant this generator produces
    fn variant(&self) -> Variant;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Generate a fresh random keypair
    fn generate(&self) -> Result<KeypairRecord, GenerationError>;

    /// Derive the record for existing private key bytes
    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError>;

    /// Valid characters for the address body (for pattern validation)
    fn valid_address_chars(&self) -> &'static str {
        self.variant().alphabet()
    }

    /// Address prefix excluded from matching (e.g. "0x")
    fn address_prefix(&self) -> &'static str {
        self.variant().address_prefix()
    }

    /// Length of the matchable address body
    fn address_body_len(&self) -> usize {
        self.variant().address_body_len()
    }

    /// Estimated single-thread generation rate
    fn throughput_per_second(&self) -> u64 {
        self.variant().throughput_per_second()
    }
}
