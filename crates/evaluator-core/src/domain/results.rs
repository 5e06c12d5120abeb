//! Typed view of a finished evaluation.
//!
//! [`AnalysisResults::from_payload`] turns the raw results body into the
//! shape the renderer works with, substituting the documented defaults for
//! anything the backend left out.

use evaluator_client::{
    EvaluationResultsPayload, OutputJudgeResult, PromptJudgeResult, RawTestCaseResult,
};
use serde::{Deserialize, Serialize};

/// Feedback used when the output judge section is missing.
pub const NO_OUTPUT_ANALYSIS: &str = "No output quality analysis available.";

/// Feedback used when the prompt judge section is missing.
pub const NO_PROMPT_ANALYSIS: &str = "No prompt quality analysis available.";

/// Generation outcome for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub test_case_index: u32,
    pub input: String,
    pub expected_output: Option<String>,
    pub generated_output: Option<String>,
    pub generation_success: bool,
    pub error: Option<String>,
}

impl From<RawTestCaseResult> for TestCaseResult {
    fn from(raw: RawTestCaseResult) -> Self {
        Self {
            test_case_index: raw.test_case_index,
            input: raw.input,
            expected_output: raw.expected_output,
            generated_output: raw.generated_output,
            generation_success: raw.generation_success.or(raw.success).unwrap_or(false),
            error: raw.error,
        }
    }
}

/// Generation outcomes plus both judge verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub test_case_results: Vec<TestCaseResult>,
    pub output_judge: OutputJudgeResult,
    pub prompt_judge: PromptJudgeResult,
}

impl AnalysisResults {
    pub fn from_payload(payload: EvaluationResultsPayload) -> Self {
        let test_case_results = payload
            .test_case_results
            .unwrap_or_default()
            .into_iter()
            .map(TestCaseResult::from)
            .collect();

        let output_judge = payload
            .output_judge_result
            .unwrap_or_else(|| OutputJudgeResult {
                test_case_scores: Vec::new(),
                overall_score: 0.0,
                overall_feedback: NO_OUTPUT_ANALYSIS.to_string(),
            });

        let prompt_judge = payload
            .prompt_judge_result
            .unwrap_or_else(|| PromptJudgeResult {
                rubric_scores: Vec::new(),
                overall_score: 0.0,
                overall_feedback: NO_PROMPT_ANALYSIS.to_string(),
            });

        Self {
            test_case_results,
            output_judge,
            prompt_judge,
        }
    }

    /// Generation outcome for a judged test case index.
    pub fn test_case(&self, index: u32) -> Option<&TestCaseResult> {
        self.test_case_results
            .iter()
            .find(|r| r.test_case_index == index)
    }

    pub fn failed_generations(&self) -> usize {
        self.test_case_results
            .iter()
            .filter(|r| !r.generation_success)
            .count()
    }
}
