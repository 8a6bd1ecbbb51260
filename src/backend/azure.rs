use async_openai::{Client, config::AzureConfig};
use async_trait::async_trait;
use secrecy::ExposeSecret;

use super::ChatCompletionBackend;
use crate::credential::Credential;
use crate::error::CompletionError;
use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};

/// API version sent when the credential does not name one.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

const DEPLOYMENTS_SEGMENT: &str = "/openai/deployments/";

/// A backend implementation for Azure OpenAI.
///
/// Bound to one [`Credential`]. Each request is routed to the deployment
/// named by its `model`, at
/// `{resource}/openai/deployments/{model}/chat/completions`.
///
/// `base_url` may be the bare resource endpoint, the endpoint with a
/// trailing `/openai`, or a full `.../openai/deployments/{name}` URL. In the
/// last form every request goes to `{name}` whatever its `model`.
pub struct AzureBackend {
    config: AzureConfig,
    credential: Credential,
    pinned_deployment: Option<String>,
}

impl AzureBackend {
    /// Creates a new `AzureBackend` using `credential`.
    pub fn new(credential: Credential) -> Self {
        let (api_base, pinned_deployment) = split_base_url(credential.base_url());
        let config = AzureConfig::new()
            .with_api_base(api_base)
            .with_api_key(credential.api_key().expose_secret())
            .with_api_version(credential.api_version().unwrap_or(DEFAULT_API_VERSION));

        Self {
            config,
            credential,
            pinned_deployment,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The deployment fixed by `base_url`, if it names one.
    pub fn pinned_deployment(&self) -> Option<&str> {
        self.pinned_deployment.as_deref()
    }

    /// Deployment a request for `model` is sent to.
    pub fn deployment_for<'a>(&'a self, model: &'a str) -> &'a str {
        self.pinned_deployment.as_deref().unwrap_or(model)
    }
}

/// Splits `base_url` into the resource endpoint and an optional deployment.
fn split_base_url(base_url: &str) -> (String, Option<String>) {
    let trimmed = base_url.trim_end_matches('/');

    if let Some(idx) = trimmed.rfind(DEPLOYMENTS_SEGMENT) {
        let deployment = trimmed[idx + DEPLOYMENTS_SEGMENT.len()..]
            .split('/')
            .next()
            .filter(|name| !name.is_empty());
        if let Some(name) = deployment {
            return (trimmed[..idx].to_string(), Some(name.to_string()));
        }
    }

    let api_base = trimmed
        .strip_suffix("/openai/deployments")
        .or_else(|| trimmed.strip_suffix("/openai"))
        .unwrap_or(trimmed);
    (api_base.to_string(), None)
}

impl std::fmt::Debug for AzureBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureBackend")
            .field("credential", &self.credential)
            .field("pinned_deployment", &self.pinned_deployment)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatCompletionBackend for AzureBackend {
    async fn chat_completion(
        &self,
        req: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, CompletionError> {
        let deployment = self.deployment_for(&req.model);
        if deployment.is_empty() {
            return Err(CompletionError::InvalidRequest(
                "request has no model to route to a deployment".to_string(),
            ));
        }
        let client = Client::with_config(self.config.clone().with_deployment_id(deployment));

        client
            .chat()
            .create(req)
            .await
            .map_err(CompletionError::from)
    }
}
