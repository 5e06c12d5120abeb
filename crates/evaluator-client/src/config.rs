//! Backend connection settings.
//!
//! Values come from the environment the same way the dashboard reads its
//! build-time `VITE_API_URL`: a single base URL that every endpoint hangs
//! off, with a hosted default.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Hosted backend used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://llm-evaluator-backend.onrender.com/api/v1";

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "EVALUATOR_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "EVALUATOR_TIMEOUT_SECS";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("llm-evaluator-client/", env!("CARGO_PKG_VERSION"));

/// Evaluator backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Base URL of the API, e.g. `http://localhost:8000/api/v1`
    pub api_url: String,
    /// Per-request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
    /// User agent header value
    pub user_agent: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            api_url: std::env::var(API_URL_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: std::env::var(TIMEOUT_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl EvaluatorConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific base URL
    pub fn new(api_url: &str) -> Self {
        EvaluatorConfig {
            api_url: api_url.to_string(),
            timeout: None,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Override the base URL
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    /// Set a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parsed base URL with any trailing slash removed from the path.
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })
    }

    /// URL of a prompt-management endpoint, e.g. `submit-evaluation`.
    pub fn endpoint(&self, path: &str) -> Result<String, ClientError> {
        let base = self.base_url()?;
        Ok(format!(
            "{}/prompt-management/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    /// URL of a per-evaluation endpoint. `id` becomes one percent-encoded
    /// path segment, so `/` or `?` in it cannot reach another route.
    pub fn resource_endpoint(&self, path: &str, id: &str) -> Result<String, ClientError> {
        let endpoint = self.endpoint(path)?;
        let mut url = Url::parse(&endpoint).map_err(|e| ClientError::InvalidUrl {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: endpoint.clone(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url.to_string())
    }

    /// `{origin}/health`, where origin is scheme, host and port of the base URL.
    pub fn health_url(&self) -> Result<String, ClientError> {
        let base = self.base_url()?;
        let origin = base.origin();
        if !origin.is_tuple() {
            return Err(ClientError::InvalidUrl {
                url: self.api_url.clone(),
                reason: "URL has no host".to_string(),
            });
        }
        Ok(format!("{}/health", origin.ascii_serialization()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_prompt_management_path() {
        let config = EvaluatorConfig::new("http://localhost:8000/api/v1/");
        assert_eq!(
            config.endpoint("run-evaluation/abc").unwrap(),
            "http://localhost:8000/api/v1/prompt-management/run-evaluation/abc"
        );
    }

    #[test]
    fn test_resource_endpoint_encodes_id() {
        let config = EvaluatorConfig::new("http://localhost:8000/api/v1");
        assert_eq!(
            config.resource_endpoint("run-evaluation", "ev-1").unwrap(),
            "http://localhost:8000/api/v1/prompt-management/run-evaluation/ev-1"
        );
        assert_eq!(
            config
                .resource_endpoint("evaluation-results", "a/b?x#y")
                .unwrap(),
            "http://localhost:8000/api/v1/prompt-management/evaluation-results/a%2Fb%3Fx%23y"
        );
    }

    #[test]
    fn test_health_url_uses_origin() {
        let config = EvaluatorConfig::new(DEFAULT_API_URL);
        assert_eq!(
            config.health_url().unwrap(),
            "https://llm-evaluator-backend.onrender.com/health"
        );

        let local = EvaluatorConfig::new("http://127.0.0.1:8000/api/v1");
        assert_eq!(local.health_url().unwrap(), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = EvaluatorConfig::new("not a url");
        assert!(matches!(
            config.endpoint("submit-evaluation"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let config = EvaluatorConfig::new("http://a")
            .with_api_url("http://b/api")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_url, "http://b/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.user_agent.starts_with("llm-evaluator-client/"));
    }
}
