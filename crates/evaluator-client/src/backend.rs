//! The backend contract as seen by the wizard.
//!
//! Everything the prompt-management flow needs from the evaluator service
//! goes through [`EvaluationBackend`], so orchestration can run against the
//! HTTP client or an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    EvaluationResultsPayload, SubmitEvaluationRequest, SubmitEvaluationResponse,
    ValidateKeyRequest, ValidateKeyResponse,
};

/// Remote evaluation service.
///
/// Guarantees expected from implementations:
/// - non-2xx answers become `ClientError::Http` carrying the decoded error body;
/// - requests that never got an answer become `ClientError::Unreachable`;
/// - no call is retried.
#[async_trait]
pub trait EvaluationBackend: Send + Sync {
    /// `POST /prompt-management/validate-api-key`
    async fn validate_api_key(&self, request: &ValidateKeyRequest) -> Result<ValidateKeyResponse>;

    /// `POST /prompt-management/submit-evaluation`
    async fn submit_evaluation(
        &self,
        request: &SubmitEvaluationRequest,
    ) -> Result<SubmitEvaluationResponse>;

    /// `POST /prompt-management/run-evaluation/{id}`; only the status matters.
    async fn run_evaluation(&self, evaluation_id: &str) -> Result<()>;

    /// `GET /prompt-management/evaluation-results/{id}`
    async fn fetch_results(&self, evaluation_id: &str) -> Result<EvaluationResultsPayload>;

    /// `GET {origin}/health`, used to wake a sleeping backend.
    async fn health(&self) -> Result<()>;
}
