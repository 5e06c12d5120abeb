//! API key validation round trip.
//!
//! One `validate-api-key` call per request. The outcome is always a
//! [`KeyValidation`]; backend and network failures become a failed
//! validation with a message instead of an error.

use evaluator_client::{ClientError, EvaluationBackend, ValidateKeyRequest};
use serde::{Deserialize, Serialize};

use crate::domain::{key_fingerprint, Result};
use crate::obs;
use crate::wizard::Wizard;

/// Shown when the backend could not be reached at all.
pub const BACKEND_UNREACHABLE: &str =
    "Could not reach the backend. Start the backend and try again.";

/// Outcome of a key validation, as displayed next to the key field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValidation {
    pub success: bool,
    pub message: String,
}

impl KeyValidation {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// An in-flight validation, tied to the credentials it was issued for.
#[derive(Debug)]
pub struct KeyValidationTicket {
    request: ValidateKeyRequest,
    revision: u64,
}

impl KeyValidationTicket {
    pub(crate) fn new(model: &str, key: String, revision: u64) -> Self {
        Self {
            request: ValidateKeyRequest {
                llm_model: model.to_string(),
                api_key: key,
            },
            revision,
        }
    }

    pub fn request(&self) -> &ValidateKeyRequest {
        &self.request
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }
}

/// Ask the backend whether `request.api_key` works for `request.llm_model`.
pub async fn check_key(
    backend: &dyn EvaluationBackend,
    request: &ValidateKeyRequest,
) -> KeyValidation {
    let outcome = match backend.validate_api_key(request).await {
        Ok(response) => {
            let message = response.message.unwrap_or_else(|| {
                if response.is_valid {
                    "API key is valid.".to_string()
                } else {
                    "Invalid API key.".to_string()
                }
            });
            KeyValidation {
                success: response.is_valid,
                message,
            }
        }
        Err(ClientError::Http { body, .. }) => KeyValidation::invalid(
            body.summary()
                .map(str::to_string)
                .unwrap_or_else(|| "Validation failed.".to_string()),
        ),
        Err(err) if err.is_unreachable() => KeyValidation::invalid(BACKEND_UNREACHABLE),
        Err(err) => KeyValidation::invalid(err.to_string()),
    };

    obs::emit_key_validation_finished(
        &request.llm_model,
        &key_fingerprint(&request.api_key),
        outcome.success,
    );
    outcome
}

/// Validate the wizard's current model/key pair and store the outcome.
///
/// Returns `Ok(None)` when nothing was sent (no model or blank key) or when
/// the credentials changed while the call was in flight.
pub async fn validate_wizard_key(
    wizard: &mut Wizard,
    backend: &dyn EvaluationBackend,
) -> Result<Option<KeyValidation>> {
    let Some(guard) = wizard.start_key_validation()? else {
        return Ok(None);
    };
    let outcome = check_key(backend, guard.request()).await;
    Ok(guard.finish(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evaluator_client::fakes::{BackendCall, MemoryBackend, Scripted};
    use evaluator_client::{ApiErrorBody, ValidateKeyResponse};

    fn request() -> ValidateKeyRequest {
        ValidateKeyRequest {
            llm_model: "mistral".to_string(),
            api_key: "m-key".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_key_default_message() {
        let backend = MemoryBackend::new();
        let outcome = check_key(&backend, &request()).await;
        assert_eq!(outcome, KeyValidation::valid("API key is valid."));
    }

    #[tokio::test]
    async fn test_invalid_key_uses_server_message() {
        let backend = MemoryBackend::new().with_validation(Scripted::Ok(ValidateKeyResponse {
            is_valid: false,
            message: Some("Key revoked".to_string()),
        }));
        let outcome = check_key(&backend, &request()).await;
        assert_eq!(outcome, KeyValidation::invalid("Key revoked"));

        let backend = MemoryBackend::new().with_validation(Scripted::Ok(ValidateKeyResponse {
            is_valid: false,
            message: None,
        }));
        assert_eq!(
            check_key(&backend, &request()).await.message,
            "Invalid API key."
        );
    }

    #[tokio::test]
    async fn test_http_failure_prefers_detail_then_message() {
        let backend = MemoryBackend::new().with_validation(Scripted::Status {
            status: 400,
            body: ApiErrorBody {
                detail: Some("Unsupported model".to_string()),
                message: Some("ignored".to_string()),
            },
        });
        assert_eq!(
            check_key(&backend, &request()).await,
            KeyValidation::invalid("Unsupported model")
        );

        let backend = MemoryBackend::new().with_validation(Scripted::Status {
            status: 500,
            body: ApiErrorBody::default(),
        });
        assert_eq!(
            check_key(&backend, &request()).await,
            KeyValidation::invalid("Validation failed.")
        );
    }

    #[tokio::test]
    async fn test_network_failure_uses_fixed_hint() {
        let backend = MemoryBackend::new().with_validation(Scripted::Unreachable);
        assert_eq!(
            check_key(&backend, &request()).await,
            KeyValidation::invalid(BACKEND_UNREACHABLE)
        );
    }

    #[tokio::test]
    async fn test_validate_wizard_key_sends_trimmed_key() {
        let backend = MemoryBackend::new();
        let mut wizard = Wizard::new();
        wizard.select_model("gemini_1_5_flash").unwrap();
        wizard.set_api_key(crate::catalog::Provider::Google, "  g-key  ");

        let outcome = validate_wizard_key(&mut wizard, &backend).await.unwrap();
        assert_eq!(outcome, Some(KeyValidation::valid("API key is valid.")));
        assert_eq!(
            backend.calls(),
            vec![BackendCall::ValidateApiKey(ValidateKeyRequest {
                llm_model: "gemini_1_5_flash".to_string(),
                api_key: "g-key".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_timed_out_validation_releases_busy_flag() {
        let backend = MemoryBackend::new().with_validation(Scripted::Pending);
        let mut wizard = Wizard::new();
        wizard.select_model("mistral").unwrap();
        wizard.set_api_key(crate::catalog::Provider::Mistral, "m-key");

        let attempt = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            validate_wizard_key(&mut wizard, &backend),
        )
        .await;
        assert!(attempt.is_err());
        assert!(!wizard.is_validating_key());
        assert!(wizard.key_validation().is_none());
    }

    #[tokio::test]
    async fn test_validate_wizard_key_without_model_sends_nothing() {
        let backend = MemoryBackend::new();
        let mut wizard = Wizard::new();
        assert!(validate_wizard_key(&mut wizard, &backend)
            .await
            .unwrap()
            .is_none());
        assert!(backend.calls().is_empty());
    }
}
