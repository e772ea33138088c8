//! Errors raised synchronously, before a search produces an outcome

use thiserror::Error;
use vanitas_chains::{GenerationError, UnsupportedVariant};
use vanitas_pattern::ValidationIssue;

#[derive(Error, Debug)]
pub enum VanityError {
    #[error("invalid search criteria: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
    #[error("a search is already running on this dispatcher")]
    Busy,
    #[error(transparent)]
    UnsupportedVariant(#[from] UnsupportedVariant),
    #[error("search controller has already been used")]
    ControllerSpent,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl VanityError {
    /// Validation issues, if this is a validation failure
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            VanityError::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
