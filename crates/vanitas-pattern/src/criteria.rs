//! Search criteria and pre-flight validation

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which part of the address a constraint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Match at start of the address body (after `0x`)
    Prefix,
    /// Match at end of address
    Suffix,
    /// Match anywhere in address
    Contains,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Suffix => write!(f, "suffix"),
            PatternType::Contains => write!(f, "substring"),
        }
    }
}

/// A problem that prevents a search from starting
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("at least one of prefix, suffix or substring is required")]
    NoConstraint,
    #[error("{field} contains invalid character '{character}' (valid: {valid})")]
    InvalidCharacter {
        field: PatternType,
        character: char,
        valid: &'static str,
    },
    #[error("{field} is {len} characters, longer than the {max}-character address")]
    TooLong {
        field: PatternType,
        len: usize,
        max: usize,
    },
}

/// Shape of the address space a pattern is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressProfile {
    /// Characters an address body can contain
    pub alphabet: &'static str,
    /// Matchable body length (prefix such as `0x` excluded)
    pub body_len: usize,
    /// Keys per second used for duration estimates
    pub throughput_per_second: u64,
}

impl AddressProfile {
    pub fn alphabet_size(&self) -> usize {
        self.alphabet.chars().count()
    }
}

/// Constraints an address must satisfy. All present constraints are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub substring: Option<String>,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            substring: None,
            case_sensitive: true,
        }
    }
}

impl SearchCriteria {
    /// Criteria with a single prefix constraint
    pub fn prefix(value: impl Into<String>) -> Self {
        Self::default().with_prefix(value)
    }

    /// Criteria with a single suffix constraint
    pub fn suffix(value: impl Into<String>) -> Self {
        Self::default().with_suffix(value)
    }

    /// Criteria with a single substring constraint
    pub fn substring(value: impl Into<String>) -> Self {
        Self::default().with_substring(value)
    }

    pub fn with_prefix(mut self, value: impl Into<String>) -> Self {
        self.prefix = Some(value.into());
        self
    }

    pub fn with_suffix(mut self, value: impl Into<String>) -> Self {
        self.suffix = Some(value.into());
        self
    }

    pub fn with_substring(mut self, value: impl Into<String>) -> Self {
        self.substring = Some(value.into());
        self
    }

    /// Make matching case insensitive
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Non-empty constraints, in prefix/suffix/substring order
    pub fn constraints(&self) -> impl Iterator<Item = (PatternType, &str)> + '_ {
        [
            (PatternType::Prefix, self.prefix.as_deref()),
            (PatternType::Suffix, self.suffix.as_deref()),
            (PatternType::Contains, self.substring.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, value)| match value {
            Some(v) if !v.is_empty() => Some((kind, v)),
            _ => None,
        })
    }

    pub fn has_constraint(&self) -> bool {
        self.constraints().next().is_some()
    }

    /// Check the criteria against an address profile.
    ///
    /// Returns every issue found; an empty list means the criteria are valid.
    pub fn validate(&self, profile: &AddressProfile) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if !self.has_constraint() {
            issues.push(ValidationIssue::NoConstraint);
            return issues;
        }

        for (field, value) in self.constraints() {
            let mut reported = BTreeSet::new();
            for c in value.chars() {
                if !is_valid_char(c, profile.alphabet, self.case_sensitive) && reported.insert(c) {
                    issues.push(ValidationIssue::InvalidCharacter {
                        field,
                        character: c,
                        valid: profile.alphabet,
                    });
                }
            }

            let len = value.chars().count();
            if len > profile.body_len {
                issues.push(ValidationIssue::TooLong {
                    field,
                    len,
                    max: profile.body_len,
                });
            }
        }

        issues
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .constraints()
            .map(|(kind, value)| format!("{}={}", kind, value))
            .collect();
        write!(f, "{}", parts.join(", "))?;
        if !self.case_sensitive {
            write!(f, " (case-insensitive)")?;
        }
        Ok(())
    }
}

/// A case-insensitive character is valid when any of its case forms is.
fn is_valid_char(c: char, alphabet: &str, case_sensitive: bool) -> bool {
    if alphabet.contains(c) {
        return true;
    }
    !case_sensitive
        && (alphabet.contains(c.to_ascii_lowercase()) || alphabet.contains(c.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE58: AddressProfile = AddressProfile {
        alphabet: "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz",
        body_len: 44,
        throughput_per_second: 25_000,
    };

    const HEX: AddressProfile = AddressProfile {
        alphabet: "0123456789abcdef",
        body_len: 40,
        throughput_per_second: 10_000,
    };

    #[test]
    fn test_valid_criteria() {
        assert!(SearchCriteria::prefix("dead").validate(&HEX).is_empty());
        assert!(SearchCriteria::prefix("AB").validate(&BASE58).is_empty());
    }

    #[test]
    fn test_no_constraint() {
        assert_eq!(
            SearchCriteria::default().validate(&HEX),
            vec![ValidationIssue::NoConstraint]
        );
        // Empty strings count as absent
        assert_eq!(
            SearchCriteria::prefix("").with_suffix("").validate(&HEX),
            vec![ValidationIssue::NoConstraint]
        );
    }

    #[test]
    fn test_excluded_base58_symbols() {
        for bad in ["0", "O", "I", "l"] {
            let issues = SearchCriteria::prefix(bad).validate(&BASE58);
            assert_eq!(issues.len(), 1, "{bad} should be rejected");
        }
    }

    #[test]
    fn test_case_folding_in_validation() {
        // Uppercase hex is only reachable through case folding
        assert!(!SearchCriteria::prefix("DEAD").validate(&HEX).is_empty());
        assert!(SearchCriteria::prefix("DEAD")
            .case_insensitive()
            .validate(&HEX)
            .is_empty());
        // '0' has no case form in Base58
        assert!(!SearchCriteria::prefix("0")
            .case_insensitive()
            .validate(&BASE58)
            .is_empty());
    }

    #[test]
    fn test_invalid_character_reported_once_per_field() {
        let issues = SearchCriteria::prefix("xx")
            .with_suffix("x")
            .validate(&HEX);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::InvalidCharacter {
                    field: PatternType::Prefix,
                    character: 'x',
                    valid: HEX.alphabet,
                },
                ValidationIssue::InvalidCharacter {
                    field: PatternType::Suffix,
                    character: 'x',
                    valid: HEX.alphabet,
                },
            ]
        );
    }

    #[test]
    fn test_too_long() {
        let issues = SearchCriteria::substring("a".repeat(41)).validate(&HEX);
        assert_eq!(
            issues,
            vec![ValidationIssue::TooLong {
                field: PatternType::Contains,
                len: 41,
                max: 40,
            }]
        );
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: SearchCriteria = serde_json::from_str(r#"{"prefix":"ab"}"#).unwrap();
        assert_eq!(criteria, SearchCriteria::prefix("ab"));
        assert!(criteria.case_sensitive);
    }

    #[test]
    fn test_display() {
        let criteria = SearchCriteria::prefix("ab").with_substring("cd").case_insensitive();
        assert_eq!(
            criteria.to_string(),
            "prefix=ab, substring=cd (case-insensitive)"
        );
    }
}
