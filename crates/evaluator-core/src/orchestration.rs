//! Evaluation orchestration: submit → run → fetch.
//!
//! The chain runs strictly in sequence. The evaluation id returned by the
//! first successful submission is cached on the wizard, so re-analysis only
//! repeats run + fetch. Every failure ends up as the wizard's single
//! user-visible message; nothing here retries.

use std::sync::Arc;

use chrono::Utc;
use evaluator_client::{ClientError, EvaluationBackend, SubmitEvaluationRequest};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::domain::error::{RUN_FAILED, SUBMIT_FAILED};
use crate::domain::{key_fingerprint, AnalysisError, AnalysisResults};
use crate::obs;
use crate::wizard::Wizard;

/// Drives analyses of a wizard against one backend.
pub struct Orchestrator<'b> {
    backend: &'b dyn EvaluationBackend,
}

impl<'b> Orchestrator<'b> {
    pub fn new(backend: &'b dyn EvaluationBackend) -> Self {
        Self { backend }
    }

    /// "Start Analysis": submit (unless an evaluation id is cached), run and
    /// fetch. On success the results are stored on the wizard.
    ///
    /// Missing credentials are reported before anything is cleared, so
    /// earlier results stay on screen.
    pub async fn analyze(&self, wizard: &mut Wizard) -> Result<(), AnalysisError> {
        wizard.check_can_analyze()?;
        if wizard.credentials().is_none() {
            let err = AnalysisError::MissingCredentials;
            obs::emit_analysis_failed(&err);
            wizard.record_analysis_error(err.to_string());
            return Err(err);
        }

        let model = wizard
            .selected_model()
            .map(|m| m.id)
            .unwrap_or("<none>");
        let mut guard = wizard.start_analysis()?;
        let outcome = self
            .execute(guard.wizard())
            .instrument(obs::analysis_span(model))
            .await;
        if let Err(err) = &outcome {
            obs::emit_analysis_failed(err);
        }
        guard.finish(outcome)
    }

    /// "Re-analyze": drop cached results and repeat the chain. With a cached
    /// evaluation id the configuration is not submitted again.
    pub async fn reanalyze(&self, wizard: &mut Wizard) -> Result<(), AnalysisError> {
        wizard.check_can_analyze()?;
        wizard.clear_results();
        self.analyze(wizard).await
    }

    async fn execute(&self, wizard: &mut Wizard) -> Result<AnalysisResults, AnalysisError> {
        let cached = wizard.evaluation_id().map(str::to_string);
        obs::emit_analysis_started(
            wizard.domain().unwrap_or(""),
            wizard.selected_model().map(|m| m.id).unwrap_or(""),
            wizard.test_cases().len(),
            cached.is_none(),
        );

        let evaluation_id = match cached {
            Some(id) => id,
            None => {
                let request = wizard
                    .submission_request()
                    .ok_or(AnalysisError::MissingCredentials)?;
                let id = submit(self.backend, &request).await?;
                wizard.set_evaluation_id(id.clone());
                id
            }
        };

        run_and_fetch(self.backend, &evaluation_id).await
    }
}

/// Submit a configuration and return the accepted evaluation id.
pub async fn submit(
    backend: &dyn EvaluationBackend,
    request: &SubmitEvaluationRequest,
) -> Result<String, AnalysisError> {
    let response = match backend.submit_evaluation(request).await {
        Ok(response) => response,
        Err(ClientError::Http { body, .. }) => {
            let message = body.message.or(body.detail);
            return Err(AnalysisError::SubmissionRejected(
                message.unwrap_or_else(|| SUBMIT_FAILED.to_string()),
            ));
        }
        Err(err) => return Err(AnalysisError::Transport(err)),
    };

    match response.accepted_id() {
        Some(id) => {
            obs::emit_evaluation_submitted(id, &key_fingerprint(&request.api_key));
            Ok(id.to_string())
        }
        None => Err(AnalysisError::SubmissionRejected(
            response
                .message
                .unwrap_or_else(|| SUBMIT_FAILED.to_string()),
        )),
    }
}

/// Execute an already submitted evaluation and load its results.
pub async fn run_and_fetch(
    backend: &dyn EvaluationBackend,
    evaluation_id: &str,
) -> Result<AnalysisResults, AnalysisError> {
    let started = Utc::now();
    match backend.run_evaluation(evaluation_id).await {
        Ok(()) => {}
        Err(ClientError::Http { body, .. }) => {
            return Err(AnalysisError::RunFailed(
                body.detail.unwrap_or_else(|| RUN_FAILED.to_string()),
            ));
        }
        Err(err) => return Err(AnalysisError::Transport(err)),
    }
    obs::emit_evaluation_run(
        evaluation_id,
        (Utc::now() - started).num_milliseconds(),
    );

    fetch(backend, evaluation_id).await
}

/// Load and normalise the results of an evaluation.
pub async fn fetch(
    backend: &dyn EvaluationBackend,
    evaluation_id: &str,
) -> Result<AnalysisResults, AnalysisError> {
    let payload = match backend.fetch_results(evaluation_id).await {
        Ok(payload) => payload,
        Err(ClientError::Http { .. }) => return Err(AnalysisError::ResultsUnavailable),
        Err(err) => return Err(AnalysisError::Transport(err)),
    };

    let results = AnalysisResults::from_payload(payload);
    obs::emit_results_fetched(
        evaluation_id,
        results.prompt_judge.overall_score,
        results.output_judge.overall_score,
    );
    Ok(results)
}

/// Fire-and-forget `GET {origin}/health` to wake the backend up.
pub fn spawn_prewarm(backend: Arc<dyn EvaluationBackend>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ok = backend.health().await.is_ok();
        obs::emit_backend_prewarm(ok);
    })
}
