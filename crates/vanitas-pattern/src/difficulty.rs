//! Match probability and expected-cost estimation
//!
//! The model treats every address symbol as uniform and independent:
//!
//! - each constrained character matches with `1 / alphabet_size`
//! - case-insensitive constraints of length `L` widen the match set by
//!   `min(2^L, alphabet_size)`. This is a heuristic, not an exact count (not
//!   every Base58 symbol has a case partner); displayed difficulties are
//!   calibrated against it
//! - a substring of length `L` can start at `body_len - L + 1` offsets
//!
//! Everything is computed as the reciprocal (expected attempts) so that exact
//! cases such as `58^2 / 4 = 841` stay exact in floating point.

use std::fmt;

use serde::Serialize;

use crate::criteria::{AddressProfile, PatternType, SearchCriteria};

/// An estimate that may have no finite value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimate {
    /// Saturates at `u128::MAX` for counts too large to hold
    Finite(u128),
    /// Zero match probability
    Unbounded,
}

impl From<u128> for Estimate {
    fn from(count: u128) -> Self {
        Estimate::Finite(count)
    }
}

impl Estimate {
    pub fn finite(self) -> Option<u128> {
        match self {
            Estimate::Finite(n) => Some(n),
            Estimate::Unbounded => None,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Finite(n) => write!(f, "{}", format_count(*n as f64)),
            Estimate::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Expected number of attempts as a float (`f64::INFINITY` when impossible)
pub fn calculate_difficulty(criteria: &SearchCriteria, profile: &AddressProfile) -> f64 {
    let alphabet_size = profile.alphabet_size() as f64;
    let mut difficulty = 1.0_f64;

    for (pattern_type, pattern) in criteria.constraints() {
        let len = pattern.chars().count();
        let exponent = len.min(i32::MAX as usize) as i32;

        difficulty *= alphabet_size.powi(exponent);

        if !criteria.case_sensitive {
            difficulty /= 2.0_f64.powi(exponent).min(alphabet_size);
        }

        if pattern_type == PatternType::Contains {
            let offsets = (profile.body_len + 1).saturating_sub(len);
            if offsets == 0 {
                return f64::INFINITY;
            }
            difficulty /= offsets as f64;
        }
    }

    // Probability is clamped to 1
    difficulty.max(1.0)
}

/// Probability that a single fresh address matches, in `[0, 1]`
pub fn estimate_probability(criteria: &SearchCriteria, profile: &AddressProfile) -> f64 {
    let difficulty = calculate_difficulty(criteria, profile);
    if difficulty.is_finite() {
        (1.0 / difficulty).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// `ceil(1 / probability)`, or `Unbounded` when the probability is zero
pub fn estimate_expected_attempts(criteria: &SearchCriteria, profile: &AddressProfile) -> Estimate {
    let difficulty = calculate_difficulty(criteria, profile);
    if !difficulty.is_finite() {
        return Estimate::Unbounded;
    }

    // Float to int casts saturate at u128::MAX
    Estimate::Finite(difficulty.ceil() as u128)
}

/// Expected wall-clock milliseconds at the profile's throughput
pub fn estimate_expected_duration_ms(
    criteria: &SearchCriteria,
    profile: &AddressProfile,
) -> Estimate {
    let throughput = u128::from(profile.throughput_per_second);
    match estimate_expected_attempts(criteria, profile) {
        Estimate::Finite(attempts) if throughput > 0 => attempts
            .checked_mul(1000)
            .map(|scaled| scaled.div_ceil(throughput))
            .unwrap_or_else(|| (attempts as f64 * 1000.0 / throughput as f64).ceil() as u128)
            .into(),
        _ => Estimate::Unbounded,
    }
}

/// Chance of at least one match after `attempts` independent tries
pub fn match_probability_after(attempts: u64, probability: f64) -> f64 {
    if probability <= 0.0 {
        return 0.0;
    }
    if probability >= 1.0 {
        return if attempts > 0 { 1.0 } else { 0.0 };
    }
    // 1 - (1 - p)^n, kept accurate for tiny p
    -(attempts as f64 * (-probability).ln_1p()).exp_m1()
}

/// Format an attempt count as human-readable string
pub fn format_count(count: f64) -> String {
    if count >= 1e18 {
        format!("{:.2e}", count)
    } else if count >= 1e15 {
        format!("{:.2}P", count / 1e15)
    } else if count >= 1e12 {
        format!("{:.2}T", count / 1e12)
    } else if count >= 1e9 {
        format!("{:.2}G", count / 1e9)
    } else if count >= 1e6 {
        format!("{:.2}M", count / 1e6)
    } else if count >= 1e3 {
        format!("{:.2}K", count / 1e3)
    } else {
        format!("{:.0}", count)
    }
}

/// Format a duration estimate in human-readable format
pub fn format_duration_ms(estimate: Estimate) -> String {
    let millis = match estimate {
        Estimate::Finite(ms) => ms as f64,
        Estimate::Unbounded => return "never".to_string(),
    };
    let seconds = millis / 1000.0;

    if seconds < 1.0 {
        format!("{:.0}ms", millis)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds < 86400.0 * 365.0 {
        format!("{:.1}d", seconds / 86400.0)
    } else if seconds < 86400.0 * 365.0 * 1e6 {
        format!("{:.1}y", seconds / (86400.0 * 365.0))
    } else {
        format!("{:.2e}y", seconds / (86400.0 * 365.0))
    }
}
