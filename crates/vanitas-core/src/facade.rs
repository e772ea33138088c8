//! Single entry point over both address variants

use serde::{Serialize, Serializer};

use vanitas_chains::{
    all_generators, extract, parse_private_key, KeyGenerator, KeypairRecord, PrivateKeyEncodings,
    UnsupportedVariant, Variant,
};
use vanitas_crypto::encoding::eip55_checksum;
use vanitas_crypto::hex;
use vanitas_crypto::zeroize::Zeroizing;
use vanitas_pattern::{
    estimate_expected_attempts, estimate_expected_duration_ms, estimate_probability, Estimate,
    SearchCriteria, ValidationIssue,
};

use std::sync::Arc;

use crate::error::VanityError;
use crate::search::{profile_of, SearchController, SearchOptions, SearchOutcome, SearchResult};
use crate::worker::{PendingSearch, WorkerDispatcher};

/// Cost estimate for a pattern on one variant
#[derive(Debug, Clone, Serialize)]
pub struct DifficultyReport {
    pub variant: Variant,
    pub criteria: String,
    pub probability: f64,
    pub expected_attempts: Estimate,
    pub expected_duration_ms: Estimate,
}

/// A keypair in the one shape shown to users, whether it came from a search
/// or an import.
#[derive(Clone, Serialize)]
pub struct KeyExport {
    pub variant: Variant,
    pub address: String,
    /// EIP-55 mixed-case form, hex addresses only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_address: Option<String>,
    #[serde(serialize_with = "expose")]
    pub private_key_hex: Zeroizing<String>,
    #[serde(serialize_with = "expose")]
    pub private_key_base58: Zeroizing<String>,
    #[serde(serialize_with = "expose")]
    pub private_key_base64: Zeroizing<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl KeyExport {
    pub fn from_result(result: &SearchResult) -> Self {
        let mut export = Self::from_record(&result.record);
        export.attempts = Some(result.attempts);
        export.elapsed_ms = Some(result.elapsed_ms);
        export
    }

    pub fn from_record(record: &KeypairRecord) -> Self {
        Self::with_encodings(record, PrivateKeyEncodings::of(record))
    }

    fn with_encodings(record: &KeypairRecord, encodings: PrivateKeyEncodings) -> Self {
        Self {
            variant: record.variant,
            address: record.public_identifier.clone(),
            checksum_address: checksum_address(record),
            private_key_hex: encodings.hex,
            private_key_base58: encodings.base58,
            private_key_base64: encodings.base64,
            attempts: None,
            elapsed_ms: None,
        }
    }
}

impl std::fmt::Debug for KeyExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyExport")
            .field("variant", &self.variant)
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

fn expose<S: Serializer>(value: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value)
}

fn checksum_address(record: &KeypairRecord) -> Option<String> {
    if record.variant != Variant::Hex {
        return None;
    }
    let bytes: [u8; 20] = hex::decode(record.address_body()).ok()?.try_into().ok()?;
    Some(eip55_checksum(&bytes))
}

/// Dispatches every operation to the generator named by a variant tag
/// (`"base58"`, `"sol"`, `"hex"`, `"eth"`, ...).
pub struct VanityFacade {
    dispatchers: Vec<WorkerDispatcher>,
}

impl Default for VanityFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl VanityFacade {
    /// Facade over the built-in generators
    pub fn new() -> Self {
        Self::with_generators(all_generators())
    }

    /// Facade over a custom generator set, one per variant
    pub fn with_generators(generators: impl IntoIterator<Item = Arc<dyn KeyGenerator>>) -> Self {
        Self {
            dispatchers: generators.into_iter().map(WorkerDispatcher::new).collect(),
        }
    }

    fn dispatcher(&self, tag: &str) -> Result<&WorkerDispatcher, VanityError> {
        let variant: Variant = tag.parse()?;
        self.dispatchers
            .iter()
            .find(|d| d.generator().variant() == variant)
            .ok_or_else(|| UnsupportedVariant(tag.to_string()).into())
    }

    /// Generator registered for a variant tag
    pub fn generator(&self, tag: &str) -> Result<Arc<dyn KeyGenerator>, VanityError> {
        self.dispatcher(tag).map(|d| Arc::clone(d.generator()))
    }

    pub fn validate(
        &self,
        tag: &str,
        criteria: &SearchCriteria,
    ) -> Result<Vec<ValidationIssue>, VanityError> {
        let generator = self.generator(tag)?;
        Ok(criteria.validate(&profile_of(generator.as_ref())))
    }

    pub fn estimate_probability(
        &self,
        tag: &str,
        criteria: &SearchCriteria,
    ) -> Result<f64, VanityError> {
        let generator = self.generator(tag)?;
        Ok(estimate_probability(criteria, &profile_of(generator.as_ref())))
    }

    pub fn estimate_expected_attempts(
        &self,
        tag: &str,
        criteria: &SearchCriteria,
    ) -> Result<Estimate, VanityError> {
        let generator = self.generator(tag)?;
        Ok(estimate_expected_attempts(criteria, &profile_of(generator.as_ref())))
    }

    pub fn estimate_expected_duration_ms(
        &self,
        tag: &str,
        criteria: &SearchCriteria,
    ) -> Result<Estimate, VanityError> {
        let generator = self.generator(tag)?;
        Ok(estimate_expected_duration_ms(criteria, &profile_of(generator.as_ref())))
    }

    /// All estimates at once
    pub fn estimate(
        &self,
        tag: &str,
        criteria: &SearchCriteria,
    ) -> Result<DifficultyReport, VanityError> {
        let generator = self.generator(tag)?;
        let profile = profile_of(generator.as_ref());
        Ok(DifficultyReport {
            variant: generator.variant(),
            criteria: criteria.to_string(),
            probability: estimate_probability(criteria, &profile),
            expected_attempts: estimate_expected_attempts(criteria, &profile),
            expected_duration_ms: estimate_expected_duration_ms(criteria, &profile),
        })
    }

    /// Run a search on the calling thread
    pub fn run(&self, tag: &str, options: SearchOptions) -> Result<SearchOutcome, VanityError> {
        let generator = self.generator(tag)?;
        SearchController::new(generator).run(options)
    }

    /// Start a search on the variant's background worker
    pub fn start(&self, tag: &str, options: SearchOptions) -> Result<PendingSearch, VanityError> {
        self.dispatcher(tag)?.start(options)
    }

    /// Stop every background search
    pub fn stop(&self) {
        for dispatcher in &self.dispatchers {
            dispatcher.stop();
        }
    }

    /// Rebuild a keypair from raw private key bytes
    pub fn extract(&self, tag: &str, private_key: &[u8]) -> Result<KeyExport, VanityError> {
        let generator = self.generator(tag)?;
        let extracted = extract(generator.as_ref(), private_key)?;
        Ok(KeyExport::with_encodings(&extracted.record, extracted.encodings))
    }

    /// Rebuild a keypair from a textual private key (JSON array, hex, Base58
    /// or Base64)
    pub fn extract_str(&self, tag: &str, private_key: &str) -> Result<KeyExport, VanityError> {
        let bytes = parse_private_key(private_key)?;
        self.extract(tag, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{NotFoundReason, SearchBudget};
    use crate::test_support::SlowGenerator;
    use std::time::Duration;
    use vanitas_chains::generator_for;
    use vanitas_pattern::{matches, PatternType};

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_unsupported_variant() {
        let facade = VanityFacade::new();
        let criteria = SearchCriteria::prefix("a");
        assert!(matches!(
            facade.validate("ton", &criteria),
            Err(VanityError::UnsupportedVariant(_))
        ));
        assert!(matches!(
            facade.estimate_probability("", &criteria),
            Err(VanityError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn test_estimates_by_tag() {
        let facade = VanityFacade::new();

        let sol = SearchCriteria::prefix("AB").case_insensitive();
        assert_eq!(
            facade.estimate_expected_attempts("sol", &sol).unwrap(),
            Estimate::Finite(841)
        );

        let eth = SearchCriteria::prefix("a1");
        assert_eq!(
            facade.estimate_expected_attempts("eth", &eth).unwrap(),
            Estimate::Finite(256)
        );
        assert_eq!(
            facade.estimate_expected_duration_ms("hex", &eth).unwrap(),
            Estimate::Finite(26)
        );

        let report = facade.estimate("base58", &sol).unwrap();
        assert_eq!(report.variant, Variant::Base58);
        assert_eq!(report.expected_duration_ms, Estimate::Finite(34));
        assert!((report.probability - 1.0 / 841.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_reports_all_issues() {
        let facade = VanityFacade::new();
        let issues = facade
            .validate("eth", &SearchCriteria::prefix("zz").with_suffix("a".repeat(41)))
            .unwrap();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[1],
            ValidationIssue::TooLong {
                field: PatternType::Suffix,
                ..
            }
        ));
    }

    #[test]
    fn test_run_in_process() {
        let facade = VanityFacade::new();
        let criteria = SearchCriteria::prefix("f");
        let outcome = facade
            .run(
                "evm",
                SearchOptions::new(criteria.clone(), SearchBudget::new(100_000, 60_000).unwrap()),
            )
            .unwrap();

        let result = outcome.found().expect("1/16 pattern should be found");
        assert!(matches(result.address(), &criteria));

        let export = KeyExport::from_result(&result);
        assert_eq!(export.address, result.address());
        assert_eq!(export.attempts, Some(result.attempts));
        assert_eq!(
            export.checksum_address.as_deref().map(str::to_lowercase),
            Some(export.address.clone())
        );
    }

    #[test]
    fn test_start_and_stop() {
        let facade = VanityFacade::with_generators([
            generator_for(Variant::Base58),
            Arc::new(SlowGenerator::new(Duration::from_millis(1))) as Arc<dyn KeyGenerator>,
        ]);
        let options = SearchOptions::new(
            SearchCriteria::prefix("ff"),
            SearchBudget::new(u64::MAX, 600_000).unwrap(),
        );

        let pending = facade.start("hex", options.clone()).unwrap();
        assert!(matches!(facade.start("hex", options), Err(VanityError::Busy)));

        facade.stop();
        assert!(matches!(
            pending.wait(),
            SearchOutcome::NotFound(NotFoundReason::Cancelled)
        ));
    }

    #[test]
    fn test_extract_hex_key() {
        let facade = VanityFacade::new();
        let export = facade.extract_str("eth", KEY_ONE).unwrap();

        assert_eq!(export.address, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
        assert_eq!(
            export.checksum_address.as_deref(),
            Some("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf")
        );
        assert_eq!(export.private_key_hex.as_str(), &KEY_ONE[2..]);
        assert_eq!(export.attempts, None);
    }

    #[test]
    fn test_extract_matches_generated_base58() {
        let facade = VanityFacade::new();
        let generator = generator_for(Variant::Base58);
        let record = generator.generate().unwrap();

        let export = facade.extract("sol", &record.private_material).unwrap();
        assert_eq!(export.address, record.public_identifier);
        assert!(export.checksum_address.is_none());

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["variant"], "base58");
        assert_eq!(json["private_key_base58"], export.private_key_base58.as_str());
        assert!(json.get("attempts").is_none());
    }

    #[test]
    fn test_extract_rejects_bad_length() {
        let facade = VanityFacade::new();
        assert!(matches!(
            facade.extract("hex", &[1u8; 5]),
            Err(VanityError::Generation(_))
        ));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let facade = VanityFacade::new();
        let export = facade.extract_str("eth", KEY_ONE).unwrap();
        assert!(!format!("{export:?}").contains(&KEY_ONE[2..]));
    }
}
