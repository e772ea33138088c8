//! Vanitas Pattern Engine
//!
//! Search criteria, validation, address matching and probability estimation.
//! Everything here is pure: no randomness, no I/O.

mod criteria;
mod difficulty;
mod matcher;

pub use criteria::{AddressProfile, PatternType, SearchCriteria, ValidationIssue};
pub use difficulty::{
    calculate_difficulty, estimate_expected_attempts, estimate_expected_duration_ms,
    estimate_probability, format_count, format_duration_ms, match_probability_after, Estimate,
};
pub use matcher::{matches, PatternMatcher};
