//! Vanity search engine

use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use vanitas_chains::{GenerationError, KeyGenerator, KeypairRecord, Variant};
use vanitas_pattern::{matches, AddressProfile, PatternMatcher, SearchCriteria, ValidationIssue};

use crate::error::VanityError;
use crate::stats::{CancelToken, ProgressEvent};

/// Attempts between progress events and scheduler yields
pub const DEFAULT_CADENCE: u64 = 1000;

const DEFAULT_MAX_ATTEMPTS: u64 = 10_000_000;
const DEFAULT_MAX_DURATION_MS: u64 = 60_000;

/// Build the pattern-side view of a generator's address space
pub fn profile_of(generator: &dyn KeyGenerator) -> AddressProfile {
    AddressProfile {
        alphabet: generator.valid_address_chars(),
        body_len: generator.address_body_len(),
        throughput_per_second: generator.throughput_per_second(),
    }
}

/// Hard limits on a single search. Both must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBudget {
    pub max_attempts: NonZeroU64,
    pub max_duration_ms: NonZeroU64,
}

impl SearchBudget {
    /// Returns `None` if either limit is zero
    pub fn new(max_attempts: u64, max_duration_ms: u64) -> Option<Self> {
        Some(Self {
            max_attempts: NonZeroU64::new(max_attempts)?,
            max_duration_ms: NonZeroU64::new(max_duration_ms)?,
        })
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU64::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU64::MIN),
            max_duration_ms: NonZeroU64::new(DEFAULT_MAX_DURATION_MS).unwrap_or(NonZeroU64::MIN),
        }
    }
}

/// Everything a single search run needs
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub criteria: SearchCriteria,
    pub budget: SearchBudget,
    /// Receives a [`ProgressEvent`] every `cadence` attempts. Events are
    /// dropped while the channel is full.
    pub progress: Option<Sender<ProgressEvent>>,
    pub cadence: NonZeroU64,
}

impl SearchOptions {
    pub fn new(criteria: SearchCriteria, budget: SearchBudget) -> Self {
        Self {
            criteria,
            budget,
            progress: None,
            cadence: NonZeroU64::new(DEFAULT_CADENCE).unwrap_or(NonZeroU64::MIN),
        }
    }

    pub fn with_progress(mut self, sink: Sender<ProgressEvent>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Set the progress/cancellation cadence. Zero is treated as one.
    pub fn with_cadence(mut self, cadence: u64) -> Self {
        self.cadence = NonZeroU64::new(cadence).unwrap_or(NonZeroU64::MIN);
        self
    }
}

/// A matching keypair and what it cost to find
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub record: KeypairRecord,
    /// Attempts including the matching one
    pub attempts: u64,
    pub elapsed_ms: u64,
}

impl SearchResult {
    pub fn address(&self) -> &str {
        &self.record.public_identifier
    }

    /// Keys per second achieved
    pub fn keys_per_second(&self) -> f64 {
        ProgressEvent {
            attempts: self.attempts,
            elapsed_ms: self.elapsed_ms,
        }
        .keys_per_second()
    }
}

/// Why a search ended without a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    AttemptsExhausted,
    TimeExhausted,
    Cancelled,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::AttemptsExhausted => write!(f, "attempt budget exhausted"),
            NotFoundReason::TimeExhausted => write!(f, "time budget exhausted"),
            NotFoundReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A search that could not run to completion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    #[error("key generation failed: {0}")]
    Generation(GenerationError),
    #[error("search worker crashed: {0}")]
    WorkerCrashed(String),
    /// The worker's controller refused the options it was handed
    #[error("search worker rejected its options: {0}")]
    Rejected(String),
}

/// Terminal result of a search
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found(SearchResult),
    NotFound(NotFoundReason),
    Failed(SearchFailure),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn found(self) -> Option<SearchResult> {
        match self {
            SearchOutcome::Found(result) => Some(result),
            _ => None,
        }
    }
}

/// Lifecycle of a [`SearchController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running,
    Found,
    Exhausted,
    Cancelled,
    Failed,
}

/// Runs one generate-and-test loop for one variant.
///
/// A controller is single use: after its run reaches a terminal state any
/// further `run` returns [`VanityError::ControllerSpent`].
pub struct SearchController {
    generator: Arc<dyn KeyGenerator>,
    cancel: CancelToken,
    state: ControllerState,
}

impl SearchController {
    pub fn new(generator: Arc<dyn KeyGenerator>) -> Self {
        Self::with_cancel_token(generator, CancelToken::new())
    }

    /// Create a controller observing an existing cancellation token
    pub fn with_cancel_token(generator: Arc<dyn KeyGenerator>, cancel: CancelToken) -> Self {
        Self {
            generator,
            cancel,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn variant(&self) -> Variant {
        self.generator.variant()
    }

    /// Token that stops this controller at its next check point
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn profile(&self) -> AddressProfile {
        profile_of(self.generator.as_ref())
    }

    /// Check criteria without running anything
    pub fn validate(&self, criteria: &SearchCriteria) -> Vec<ValidationIssue> {
        criteria.validate(&self.profile())
    }

    /// Run the search, blocking until a terminal outcome.
    ///
    /// Invalid criteria are rejected before any key is generated and leave
    /// the controller idle.
    pub fn run(&mut self, options: SearchOptions) -> Result<SearchOutcome, VanityError> {
        if self.state != ControllerState::Idle {
            return Err(VanityError::ControllerSpent);
        }

        let issues = self.validate(&options.criteria);
        if !issues.is_empty() {
            return Err(VanityError::Validation(issues));
        }

        self.state = ControllerState::Running;
        info!(
            variant = %self.generator.variant(),
            criteria = %options.criteria,
            max_attempts = options.budget.max_attempts.get(),
            max_duration_ms = options.budget.max_duration_ms.get(),
            "Starting vanity search"
        );

        let start = Instant::now();
        let (outcome, attempts) = self.search_loop(&options, start);

        self.state = match &outcome {
            SearchOutcome::Found(_) => ControllerState::Found,
            SearchOutcome::NotFound(NotFoundReason::Cancelled) => ControllerState::Cancelled,
            SearchOutcome::NotFound(_) => ControllerState::Exhausted,
            SearchOutcome::Failed(_) => ControllerState::Failed,
        };

        let elapsed_ms = elapsed_ms(start);
        match &outcome {
            SearchOutcome::Failed(failure) => {
                warn!(attempts, elapsed_ms, error = %failure, "Vanity search failed")
            }
            SearchOutcome::NotFound(reason) => {
                info!(attempts, elapsed_ms, reason = %reason, "Vanity search ended without a match")
            }
            SearchOutcome::Found(result) => info!(
                attempts,
                elapsed_ms,
                address = %result.address(),
                "Vanity search found a match"
            ),
        }

        Ok(outcome)
    }

    fn search_loop(&self, options: &SearchOptions, start: Instant) -> (SearchOutcome, u64) {
        let matcher = PatternMatcher::new(&options.criteria);
        let max_attempts = options.budget.max_attempts.get();
        let max_duration_ms = options.budget.max_duration_ms.get();
        let cadence = options.cadence.get();
        let mut attempts = 0u64;

        loop {
            let record = match self.generator.generate() {
                Ok(record) => record,
                Err(e) => {
                    return (SearchOutcome::Failed(SearchFailure::Generation(e)), attempts);
                }
            };
            attempts += 1;

            // Second check guards against a matcher/criteria mismatch
            if matcher.matches(&record.public_identifier)
                && matches(&record.public_identifier, &options.criteria)
            {
                let result = SearchResult {
                    record,
                    attempts,
                    elapsed_ms: elapsed_ms(start),
                };
                return (SearchOutcome::Found(result), attempts);
            }

            if self.cancel.is_cancelled() {
                return (SearchOutcome::NotFound(NotFoundReason::Cancelled), attempts);
            }
            if attempts >= max_attempts {
                return (SearchOutcome::NotFound(NotFoundReason::AttemptsExhausted), attempts);
            }
            if elapsed_ms(start) >= max_duration_ms {
                return (SearchOutcome::NotFound(NotFoundReason::TimeExhausted), attempts);
            }

            if attempts % cadence == 0 {
                let event = ProgressEvent {
                    attempts,
                    elapsed_ms: elapsed_ms(start),
                };
                debug!(attempts = event.attempts, elapsed_ms = event.elapsed_ms, "Search progress");
                if let Some(sink) = &options.progress {
                    // Progress is lossy: a full or disconnected sink never
                    // holds up the budget and cancellation checks
                    let _ = sink.try_send(event);
                }
                thread::yield_now();
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
