//! Azure OpenAI chat completions client.
//!
//! `POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`
//! with the key in the `api-key` header. A single attempt, transport default timeouts.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{CompletionClient, CompletionRequest, CompletionResponse, Deployment, RelayError};

/// [`CompletionClient`] over HTTP with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct AzureOpenAiClient {
    http: Client,
}

impl AzureOpenAiClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Deployment<'_> {
    /// Full chat completions URL for this deployment.
    pub fn completions_url(&self) -> Result<Url, RelayError> {
        let mut url = Url::parse(self.endpoint)
            .map_err(|e| RelayError::Unexpected(format!("Invalid endpoint URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| RelayError::Unexpected("Endpoint URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["openai", "deployments", self.name, "chat", "completions"]);

        url.query_pairs_mut()
            .append_pair("api-version", self.api_version);

        Ok(url)
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    async fn complete(
        &self,
        deployment: &Deployment<'_>,
        request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse, RelayError> {
        let url = deployment.completions_url()?;

        let resp = self
            .http
            .post(url)
            .header("api-key", deployment.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::Unexpected(format!("Completion request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<CompletionResponse>()
            .await
            .map_err(|e| RelayError::Unexpected(format!("Completion response parse error: {e}")))
    }
}
