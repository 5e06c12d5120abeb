//! Error taxonomy for the wizard and the evaluation chain.

use evaluator_client::ClientError;

use crate::wizard::{GateIssue, Phase};

/// Fallback when the submission failed without a server message.
pub const SUBMIT_FAILED: &str = "Failed to submit evaluation.";
/// Fallback when the run failed without a server detail.
pub const RUN_FAILED: &str = "Failed to run evaluation.";

/// Errors produced by wizard edits and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("unknown rubric: {0}")]
    UnknownRubric(String),

    #[error("rubric not selected: {0}")]
    RubricNotSelected(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown test case: {0}")]
    UnknownTestCase(String),

    #[error("{phase} is incomplete: {}", format_issues(.issues))]
    PhaseIncomplete {
        phase: Phase,
        issues: Vec<GateIssue>,
    },

    #[error("action requires {expected}, wizard is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("an analysis is already running")]
    AnalysisInProgress,

    #[error("an API key validation is already running")]
    ValidationInProgress,
}

fn format_issues(issues: &[GateIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures of the submit → run → fetch chain. `Display` is the message
/// shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Select an LLM and enter an API key.")]
    MissingCredentials,

    #[error("{0}")]
    SubmissionRejected(String),

    #[error("{0}")]
    RunFailed(String),

    #[error("Failed to load evaluation results.")]
    ResultsUnavailable,

    #[error("Analysis failed: {0}")]
    Transport(ClientError),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// Result type for wizard operations.
pub type Result<T> = std::result::Result<T, WizardError>;
