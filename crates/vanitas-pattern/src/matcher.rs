//! Pattern matching implementation

use std::borrow::Cow;

use crate::criteria::SearchCriteria;

/// Canonical hex prefix. Never part of matching; Base58 bodies cannot start
/// with `0`, so stripping it is safe for every variant.
const HEX_PREFIX: &str = "0x";

/// Criteria prepared for the search loop: empty constraints dropped and
/// patterns case-folded once up front.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    prefix: Option<String>,
    suffix: Option<String>,
    contains: Option<String>,
    case_sensitive: bool,
}

impl PatternMatcher {
    /// Compile criteria into a matcher
    pub fn new(criteria: &SearchCriteria) -> Self {
        let fold = |value: &Option<String>| -> Option<String> {
            value.as_deref().filter(|v| !v.is_empty()).map(|v| {
                if criteria.case_sensitive {
                    v.to_string()
                } else {
                    v.to_lowercase()
                }
            })
        };

        Self {
            prefix: fold(&criteria.prefix),
            suffix: fold(&criteria.suffix),
            contains: fold(&criteria.substring),
            case_sensitive: criteria.case_sensitive,
        }
    }

    /// Check an address. A pattern longer than the body never matches.
    pub fn matches(&self, address: &str) -> bool {
        let body = address.strip_prefix(HEX_PREFIX).unwrap_or(address);
        let body: Cow<'_, str> = if self.case_sensitive {
            Cow::Borrowed(body)
        } else {
            Cow::Owned(body.to_lowercase())
        };

        let fits = |pattern: &Option<String>| pattern.as_ref().map_or(0, String::len) <= body.len();
        if !(fits(&self.prefix) && fits(&self.suffix) && fits(&self.contains)) {
            return false;
        }

        self.prefix.as_ref().map_or(true, |p| body.starts_with(p.as_str()))
            && self.suffix.as_ref().map_or(true, |s| body.ends_with(s.as_str()))
            && self.contains.as_ref().map_or(true, |c| body.contains(c.as_str()))
    }
}

/// Test an address against criteria without keeping a compiled matcher
pub fn matches(address: &str, criteria: &SearchCriteria) -> bool {
    PatternMatcher::new(criteria).matches(address)
}
