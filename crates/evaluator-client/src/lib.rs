//! Evaluator-Client: HTTP contract with the LLM evaluator backend
//!
//! This crate owns everything that crosses the wire for the
//! prompt-management flow: backend configuration, request/response
//! types, the [`EvaluationBackend`] trait and its reqwest implementation.
//!
//! ## Key Components
//!
//! - `EvaluatorConfig`: base URL, timeout and user agent
//! - `HttpBackend`: reqwest client for `/prompt-management/*` and `/health`
//! - `fakes::MemoryBackend`: scripted in-memory backend for tests

pub mod backend;
pub mod config;
mod error;
pub mod fakes;
mod http;
pub mod types;

pub use backend::EvaluationBackend;
pub use config::{EvaluatorConfig, API_URL_ENV, DEFAULT_API_URL};
pub use error::{ClientError, Result};
pub use http::{HttpBackend, REQUEST_ID_HEADER};
pub use types::{
    ApiErrorBody, EvaluationResultsPayload, OutputJudgeResult, OutputJudgeTestCaseScore,
    PromptJudgeResult, PromptJudgeRubricScore, RawTestCaseResult, RubricPayload,
    SubmitEvaluationRequest, SubmitEvaluationResponse, TestCasePayload, ValidateKeyRequest,
    ValidateKeyResponse,
};
