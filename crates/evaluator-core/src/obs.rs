//! Structured observability hooks for the evaluation lifecycle.
//!
//! This module provides:
//! - an analysis-scoped span to instrument the submit → run → fetch chain
//! - emission functions for key lifecycle events
//!
//! Events are emitted at `info!` level; failures at `warn!`. API keys are
//! only ever logged as fingerprints.

use tracing::{info, warn, Span};

/// Span tagged with the model under evaluation. Attach with
/// `tracing::Instrument::instrument` so it survives await points.
pub fn analysis_span(model: &str) -> Span {
    tracing::info_span!("evaluator.analysis", model = %model)
}

/// Emit event: analysis started. `resubmit` is false when a cached
/// evaluation id is reused.
pub fn emit_analysis_started(domain: &str, model: &str, test_cases: usize, resubmit: bool) {
    info!(
        event = "analysis.started",
        domain = %domain,
        model = %model,
        test_cases = test_cases,
        resubmit = resubmit,
    );
}

/// Emit event: configuration accepted by the backend.
pub fn emit_evaluation_submitted(evaluation_id: &str, key_fingerprint: &str) {
    info!(
        event = "evaluation.submitted",
        evaluation_id = %evaluation_id,
        key_fingerprint = %key_fingerprint,
    );
}

/// Emit event: backend finished executing the evaluation.
pub fn emit_evaluation_run(evaluation_id: &str, duration_ms: i64) {
    info!(
        event = "evaluation.run",
        evaluation_id = %evaluation_id,
        duration_ms = duration_ms,
    );
}

/// Emit event: results fetched and normalised.
pub fn emit_results_fetched(evaluation_id: &str, prompt_score: f64, output_score: f64) {
    info!(
        event = "results.fetched",
        evaluation_id = %evaluation_id,
        prompt_score = prompt_score,
        output_score = output_score,
    );
}

/// Emit event: analysis chain aborted (warning level).
pub fn emit_analysis_failed(error: &dyn std::fmt::Display) {
    warn!(event = "analysis.failed", error = %error);
}

/// Emit event: key validation round trip finished.
pub fn emit_key_validation_finished(model: &str, key_fingerprint: &str, success: bool) {
    info!(
        event = "key_validation.finished",
        model = %model,
        key_fingerprint = %key_fingerprint,
        success = success,
    );
}

/// Emit event: health pre-warm finished. The outcome is informational only.
pub fn emit_backend_prewarm(ok: bool) {
    tracing::debug!(event = "backend.prewarm", ok = ok);
}
