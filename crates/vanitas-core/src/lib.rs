//! Vanitas Core Engine
//!
//! Search controller, background worker dispatch and the variant-dispatching
//! facade.

mod error;
mod facade;
mod search;
mod stats;
mod worker;

#[cfg(test)]
mod test_support;

pub use error::VanityError;
pub use facade::{DifficultyReport, KeyExport, VanityFacade};
pub use search::{
    profile_of, ControllerState, NotFoundReason, SearchBudget, SearchController, SearchFailure,
    SearchOptions, SearchOutcome, SearchResult, DEFAULT_CADENCE,
};
pub use stats::{CancelToken, ProgressEvent};
pub use worker::{PendingSearch, WorkerDispatcher, WorkerMessage};

// Re-exports for convenience
pub use vanitas_chains::{
    all_generators, generator_for, get_generator, GenerationError, KeyGenerator, KeypairRecord,
    UnsupportedVariant, Variant,
};
pub use vanitas_pattern::{
    format_count, format_duration_ms, matches, AddressProfile, Estimate, PatternMatcher,
    PatternType, SearchCriteria, ValidationIssue,
};
