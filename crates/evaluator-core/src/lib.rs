//! Evaluator Core Library
//!
//! Prompt-management flow of the LLM evaluator: static catalog, the
//! three-phase wizard, API key validation, the submit → run → fetch
//! orchestration and score rendering.

pub mod catalog;
pub mod domain;
pub mod key_validation;
pub mod obs;
pub mod orchestration;
pub mod render;
pub mod reporting;
pub mod telemetry;
pub mod wizard;

pub use catalog::{
    find_domain, find_model, find_rubric, Domain, ModelDescriptor, Provider, RubricDescriptor,
    DOMAINS, MODELS, RUBRICS,
};

pub use domain::{
    key_fingerprint, AnalysisError, AnalysisResults, ApiKeySet, Result, Rubric, TestCase,
    TestCaseResult, WizardError, NO_OUTPUT_ANALYSIS, NO_PROMPT_ANALYSIS,
};

pub use key_validation::{
    check_key, validate_wizard_key, KeyValidation, KeyValidationTicket, BACKEND_UNREACHABLE,
};
pub use orchestration::{fetch, run_and_fetch, spawn_prewarm, submit, Orchestrator};
pub use render::{score_badge, BadgeVariant, ExpandedRows, ScoreTier};
pub use reporting::{render_report_text, AnalysisReport};
pub use telemetry::init_tracing;
pub use wizard::{AnalysisGuard, GateIssue, KeyValidationGuard, Phase, Wizard};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
