//! Deterministic key generators for driving the engine in tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use vanitas_chains::{GenerationError, KeyGenerator, KeypairRecord, Variant};
use vanitas_crypto::zeroize::Zeroizing;

/// A hex address no `ff`-style pattern matches
pub const HEX_MISS: &str = "0x0000000000000000000000000000000000000000";

fn hex_record(address: &str) -> KeypairRecord {
    KeypairRecord {
        public_identifier: address.to_string(),
        private_material: Zeroizing::new(vec![7u8; 32]),
        variant: Variant::Hex,
    }
}

fn rebuild(private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
    Err(GenerationError::InvalidKeyMaterial(format!(
        "cannot import {} bytes",
        private_key.len()
    )))
}

/// Yields the scripted addresses in order, then [`HEX_MISS`] forever
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<String>>,
    calls: AtomicU64,
}

impl ScriptedGenerator {
    pub fn hex(script: Vec<String>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for ScriptedGenerator {
    fn variant(&self) -> Variant {
        Variant::Hex
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        Ok(hex_record(next.as_deref().unwrap_or(HEX_MISS)))
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        rebuild(private_key)
    }
}

/// Succeeds `healthy` times, then reports exhausted randomness
pub struct FailingGenerator {
    healthy: u64,
    calls: AtomicU64,
}

impl FailingGenerator {
    pub fn new(healthy: u64) -> Self {
        Self {
            healthy,
            calls: AtomicU64::new(0),
        }
    }
}

impl KeyGenerator for FailingGenerator {
    fn variant(&self) -> Variant {
        Variant::Hex
    }

    fn name(&self) -> &'static str {
        "Failing"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.healthy {
            Ok(hex_record(HEX_MISS))
        } else {
            Err(GenerationError::RandomnessUnavailable("entropy source closed".into()))
        }
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        rebuild(private_key)
    }
}

/// Never matches and sleeps on every attempt
pub struct SlowGenerator {
    delay: Duration,
    calls: AtomicU64,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for SlowGenerator {
    fn variant(&self) -> Variant {
        Variant::Hex
    }

    fn name(&self) -> &'static str {
        "Slow"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        Ok(hex_record(HEX_MISS))
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        rebuild(private_key)
    }
}

/// Panics on the first attempt
pub struct PanickingGenerator;

impl KeyGenerator for PanickingGenerator {
    fn variant(&self) -> Variant {
        Variant::Hex
    }

    fn name(&self) -> &'static str {
        "Panicking"
    }

    fn generate(&self) -> Result<KeypairRecord, GenerationError> {
        panic!("generator exploded")
    }

    fn from_private_bytes(&self, private_key: &[u8]) -> Result<KeypairRecord, GenerationError> {
        rebuild(private_key)
    }
}
