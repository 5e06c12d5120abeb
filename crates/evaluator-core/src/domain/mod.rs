//! Domain models for the prompt-management flow.
//!
//! - `Rubric`: weighted scoring criterion
//! - `TestCase`: input plus optional expected output
//! - `ApiKeySet`: one key per provider
//! - `AnalysisResults`: normalised judge verdicts

pub mod api_keys;
pub mod error;
pub mod results;
pub mod rubric;
pub mod test_case;

pub use api_keys::{key_fingerprint, ApiKeySet};
pub use error::{AnalysisError, Result, WizardError};
pub use results::{AnalysisResults, TestCaseResult, NO_OUTPUT_ANALYSIS, NO_PROMPT_ANALYSIS};
pub use rubric::{total_weight, Rubric, MAX_WEIGHT, REQUIRED_TOTAL_WEIGHT};
pub use test_case::TestCase;
