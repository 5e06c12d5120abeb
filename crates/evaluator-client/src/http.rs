//! reqwest implementation of [`EvaluationBackend`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::EvaluationBackend;
use crate::config::EvaluatorConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    ApiErrorBody, EvaluationResultsPayload, SubmitEvaluationRequest, SubmitEvaluationResponse,
    ValidateKeyRequest, ValidateKeyResponse,
};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the evaluator backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: EvaluatorConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new client. Fails if the base URL does not parse.
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        config.base_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(HttpBackend {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(EvaluatorConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<Vec<u8>> {
        let request_id = Uuid::new_v4().to_string();
        debug!(url = %url, request_id = %request_id, "sending request");

        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ClientError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let body = ApiErrorBody::from_bytes(&bytes);
            warn!(
                url = %url,
                request_id = %request_id,
                status = status.as_u16(),
                detail = body.summary().unwrap_or(""),
                "backend returned error status"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        let bytes = self
            .send(&url, self.http_client.post(&url).json(body))
            .await?;
        decode(&bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl EvaluationBackend for HttpBackend {
    async fn validate_api_key(&self, request: &ValidateKeyRequest) -> Result<ValidateKeyResponse> {
        self.post_json("validate-api-key", request).await
    }

    async fn submit_evaluation(
        &self,
        request: &SubmitEvaluationRequest,
    ) -> Result<SubmitEvaluationResponse> {
        self.post_json("submit-evaluation", request).await
    }

    async fn run_evaluation(&self, evaluation_id: &str) -> Result<()> {
        let url = self
            .config
            .resource_endpoint("run-evaluation", evaluation_id)?;
        self.send(&url, self.http_client.post(&url)).await?;
        Ok(())
    }

    async fn fetch_results(&self, evaluation_id: &str) -> Result<EvaluationResultsPayload> {
        let url = self
            .config
            .resource_endpoint("evaluation-results", evaluation_id)?;
        let bytes = self.send(&url, self.http_client.get(&url)).await?;
        decode(&bytes)
    }

    async fn health(&self) -> Result<()> {
        let url = self.config.health_url()?;
        self.send(&url, self.http_client.get(&url)).await?;
        Ok(())
    }
}
