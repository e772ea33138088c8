//! Normalize imported key bytes into a [`KeypairRecord`] plus its textual
//! encodings.

use vanitas_crypto::encoding::{base58_decode, base58_encode, base64_decode, base64_encode};
use vanitas_crypto::hex;
use vanitas_crypto::zeroize::Zeroizing;

use crate::traits::{GenerationError, KeyGenerator, KeypairRecord};

/// Private material rendered for display
pub struct PrivateKeyEncodings {
    pub hex: Zeroizing<String>,
    pub base58: Zeroizing<String>,
    pub base64: Zeroizing<String>,
}

impl PrivateKeyEncodings {
    pub fn of(record: &KeypairRecord) -> Self {
        let bytes: &[u8] = &record.private_material;
        Self {
            hex: Zeroizing::new(hex::encode(bytes)),
            base58: Zeroizing::new(base58_encode(bytes)),
            base64: Zeroizing::new(base64_encode(bytes)),
        }
    }
}

/// A record rebuilt from imported bytes
pub struct ExtractedKey {
    pub record: KeypairRecord,
    pub encodings: PrivateKeyEncodings,
}

/// Rebuild the record for `raw` private key bytes and encode its material.
pub fn extract(generator: &dyn KeyGenerator, raw: &[u8]) -> Result<ExtractedKey, GenerationError> {
    let record = generator.from_private_bytes(raw)?;
    let encodings = PrivateKeyEncodings::of(&record);
    Ok(ExtractedKey { record, encodings })
}

/// Decode a private key given as text.
///
/// Accepted forms, tried in order: a JSON byte array (Solana keypair file),
/// hex with optional `0x`, Base58, Base64.
pub fn parse_private_key(input: &str) -> Result<Zeroizing<Vec<u8>>, GenerationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GenerationError::InvalidKeyMaterial("empty key".into()));
    }

    if input.starts_with('[') {
        let bytes: Vec<u8> = serde_json::from_str(input)
            .map_err(|e| GenerationError::InvalidKeyMaterial(format!("bad byte array: {}", e)))?;
        return Ok(Zeroizing::new(bytes));
    }

    let unprefixed = input.strip_prefix("0x").unwrap_or(input);
    if unprefixed.len() % 2 == 0 && unprefixed.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Ok(bytes) = hex::decode(unprefixed) {
            return Ok(Zeroizing::new(bytes));
        }
    }

    if let Ok(bytes) = base58_decode(input) {
        return Ok(Zeroizing::new(bytes));
    }

    base64_decode(input)
        .map(Zeroizing::new)
        .map_err(|_| GenerationError::InvalidKeyMaterial("unrecognized key encoding".into()))
}
