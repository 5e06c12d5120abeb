//! In-memory fake backend (testing only)
//!
//! `MemoryBackend` answers every endpoint from scripted values and records
//! each call so tests can assert on the request sequence.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::EvaluationBackend;
use crate::error::{ClientError, Result};
use crate::types::{
    ApiErrorBody, EvaluationResultsPayload, SubmitEvaluationRequest, SubmitEvaluationResponse,
    ValidateKeyRequest, ValidateKeyResponse,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ValidateApiKey(ValidateKeyRequest),
    Submit(SubmitEvaluationRequest),
    Run(String),
    FetchResults(String),
    Health,
}

/// Scripted outcome of an endpoint.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Status { status: u16, body: ApiErrorBody },
    Unreachable,
    /// Never answers; for exercising dropped or timed-out calls.
    Pending,
}

impl<T> Scripted<T> {
    async fn resolve(self, url: &str) -> Result<T> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Status { status, body } => Err(ClientError::Http { status, body }),
            Scripted::Unreachable => Err(ClientError::Unreachable {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            Scripted::Pending => std::future::pending().await,
        }
    }
}

#[derive(Debug)]
struct Script {
    validate: Scripted<ValidateKeyResponse>,
    submit: Scripted<SubmitEvaluationResponse>,
    run: Scripted<()>,
    results: Scripted<EvaluationResultsPayload>,
    health: Scripted<()>,
}

/// In-memory `EvaluationBackend` with scripted responses.
#[derive(Debug)]
pub struct MemoryBackend {
    script: Mutex<Script>,
    calls: Mutex<Vec<BackendCall>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            script: Mutex::new(Script {
                validate: Scripted::Ok(ValidateKeyResponse {
                    is_valid: true,
                    message: None,
                }),
                submit: Scripted::Ok(SubmitEvaluationResponse {
                    success: true,
                    evaluation_id: Some("eval-1".to_string()),
                    message: None,
                }),
                run: Scripted::Ok(()),
                results: Scripted::Ok(EvaluationResultsPayload::default()),
                health: Scripted::Ok(()),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(self, outcome: Scripted<ValidateKeyResponse>) -> Self {
        self.script.lock().unwrap().validate = outcome;
        self
    }

    pub fn with_submission(self, outcome: Scripted<SubmitEvaluationResponse>) -> Self {
        self.script.lock().unwrap().submit = outcome;
        self
    }

    pub fn with_run(self, outcome: Scripted<()>) -> Self {
        self.script.lock().unwrap().run = outcome;
        self
    }

    pub fn with_results(self, outcome: Scripted<EvaluationResultsPayload>) -> Self {
        self.script.lock().unwrap().results = outcome;
        self
    }

    pub fn with_health(self, outcome: Scripted<()>) -> Self {
        self.script.lock().unwrap().health = outcome;
        self
    }

    /// Replace the results outcome after construction.
    pub fn set_results(&self, outcome: Scripted<EvaluationResultsPayload>) {
        self.script.lock().unwrap().results = outcome;
    }

    /// Replace the run outcome after construction.
    pub fn set_run(&self, outcome: Scripted<()>) {
        self.script.lock().unwrap().run = outcome;
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `submit-evaluation` calls so far.
    pub fn submit_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, BackendCall::Submit(_)))
            .count()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EvaluationBackend for MemoryBackend {
    async fn validate_api_key(&self, request: &ValidateKeyRequest) -> Result<ValidateKeyResponse> {
        self.record(BackendCall::ValidateApiKey(request.clone()));
        let outcome = self.script.lock().unwrap().validate.clone();
        outcome.resolve("memory://validate-api-key").await
    }

    async fn submit_evaluation(
        &self,
        request: &SubmitEvaluationRequest,
    ) -> Result<SubmitEvaluationResponse> {
        self.record(BackendCall::Submit(request.clone()));
        let outcome = self.script.lock().unwrap().submit.clone();
        outcome.resolve("memory://submit-evaluation").await
    }

    async fn run_evaluation(&self, evaluation_id: &str) -> Result<()> {
        self.record(BackendCall::Run(evaluation_id.to_string()));
        let outcome = self.script.lock().unwrap().run.clone();
        outcome.resolve("memory://run-evaluation").await
    }

    async fn fetch_results(&self, evaluation_id: &str) -> Result<EvaluationResultsPayload> {
        self.record(BackendCall::FetchResults(evaluation_id.to_string()));
        let outcome = self.script.lock().unwrap().results.clone();
        outcome.resolve("memory://evaluation-results").await
    }

    async fn health(&self) -> Result<()> {
        self.record(BackendCall::Health);
        let outcome = self.script.lock().unwrap().health.clone();
        outcome.resolve("memory://health").await
    }
}
