//! Wire types of the `/prompt-management` API.
//!
//! Request bodies serialize to the exact field names the backend expects.
//! Response bodies are decoded leniently: judge objects and their fields
//! fall back to empty/zero values when missing or `null`, so a partial
//! payload never fails to parse.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same way as a missing field. FastAPI emits `null` for
/// every unset optional field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// validate-api-key
// ---------------------------------------------------------------------------

/// Body of `POST /prompt-management/validate-api-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateKeyRequest {
    pub llm_model: String,
    pub api_key: String,
}

/// Successful validation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateKeyResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// submit-evaluation
// ---------------------------------------------------------------------------

/// A rubric as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricPayload {
    pub id: String,
    pub name: String,
    pub weight: u32,
    /// Always present; empty when the rubric has no description.
    pub description: String,
}

/// A test case as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCasePayload {
    pub id: String,
    pub input: String,
    #[serde(
        rename = "expectedOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_output: Option<String>,
}

/// Body of `POST /prompt-management/submit-evaluation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub domain_id: String,
    pub rubrics: Vec<RubricPayload>,
    pub prompt: String,
    pub llm_model: String,
    pub api_key: String,
    pub test_cases: Vec<TestCasePayload>,
}

/// Response of `submit-evaluation`. `success` and `evaluation_id` must both
/// be set for the submission to count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEvaluationResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub evaluation_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitEvaluationResponse {
    /// The evaluation id when the backend accepted the submission.
    pub fn accepted_id(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.evaluation_id.as_deref().filter(|id| !id.is_empty())
    }
}

// ---------------------------------------------------------------------------
// evaluation-results
// ---------------------------------------------------------------------------

/// Output judge score for one test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputJudgeTestCaseScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_case_index: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correctness: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relevance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completeness: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
}

/// Judge #1: quality of the generated outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputJudgeResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_case_scores: Vec<OutputJudgeTestCaseScore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_feedback: String,
}

/// Prompt judge score for one rubric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptJudgeRubricScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rubric_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rubric_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
}

/// Judge #2: quality of the prompt against the selected rubrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptJudgeResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rubric_scores: Vec<PromptJudgeRubricScore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_feedback: String,
}

/// Raw per-test-case generation outcome. Older backends report `success`
/// instead of `generation_success`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTestCaseResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_case_index: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input: String,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub generated_output: Option<String>,
    #[serde(default)]
    pub generation_success: Option<bool>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /prompt-management/evaluation-results/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResultsPayload {
    #[serde(default)]
    pub test_case_results: Option<Vec<RawTestCaseResult>>,
    #[serde(default)]
    pub output_judge_result: Option<OutputJudgeResult>,
    #[serde(default)]
    pub prompt_judge_result: Option<PromptJudgeResult>,
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

/// Error body returned with non-2xx responses. FastAPI uses `detail`, the
/// evaluation endpoints sometimes use `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Decode an error body, tolerating non-JSON and structured `detail`
    /// values (validation errors come back as arrays).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
            return Self::default();
        };
        let text = |key: &str| match value.get(key) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        Self {
            detail: text("detail"),
            message: text("message"),
        }
    }

    /// `detail`, else `message`.
    pub fn summary(&self) -> Option<&str> {
        self.detail.as_deref().or(self.message.as_deref())
    }
}
