//! Chat relay — forwards a transcript to the hosted completion API.
//!
//! One call per request, no retry:
//! 1. Check configuration (fail fast, no network I/O)
//! 2. Prepend the system instruction to the outbound transcript if absent
//! 3. Call the completion deployment with fixed `max_tokens` / `temperature`
//! 4. Return the first choice's content, or a classified [`RelayError`]

pub mod azure;
pub mod config;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::message::{Message, with_system_instruction};

pub use azure::AzureOpenAiClient;
pub use config::RelayConfig;

/// Response length cap sent with every completion call.
pub const MAX_TOKENS: u32 = 800;

/// Sampling temperature sent with every completion call.
pub const TEMPERATURE: f64 = 0.7;

/// Relay failures. The `Display` text is what callers are shown.
#[derive(Debug, Error)]
pub enum RelayError {
    /// One or more required settings are unset; holds their variable names.
    #[error("Service configuration error")]
    MissingConfiguration(Vec<&'static str>),

    /// The completion API answered with a non-success status.
    #[error("Error communicating with AI service")]
    Upstream { status: u16, body: String },

    /// The completion API answered successfully but without a usable choice.
    #[error("AI service returned no completion")]
    EmptyCompletion,

    #[error("An unexpected error occurred")]
    Unexpected(String),
}

impl RelayError {
    /// Upstream status code, when the failure came from the completion API.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RelayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Resolved completion deployment, borrowed from [`RelayConfig`].
///
/// Not `Debug`: it carries the access key.
#[derive(Clone, Copy)]
pub struct Deployment<'a> {
    pub endpoint: &'a str,
    pub api_key: &'a str,
    pub name: &'a str,
    pub api_version: &'a str,
}

/// Body of a chat completions call.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub max_tokens: u32,
    pub temperature: f64,
}

/// The part of a chat completions response the relay reads.
#[derive(Debug, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice.
    pub fn into_reply(self) -> Result<String, RelayError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(RelayError::EmptyCompletion)
    }
}

/// Transport to the completion API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform one completion call.
    ///
    /// Non-success statuses must come back as [`RelayError::Upstream`].
    async fn complete(
        &self,
        deployment: &Deployment<'_>,
        request: &CompletionRequest<'_>,
    ) -> Result<CompletionResponse, RelayError>;
}

/// The relay pipeline: configuration check, instruction injection, one call.
#[derive(Clone)]
pub struct Relay {
    config: RelayConfig,
    client: Arc<dyn CompletionClient>,
}

impl Relay {
    pub fn new(config: RelayConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    /// Relay backed by the Azure OpenAI HTTP client.
    pub fn azure(config: RelayConfig) -> Self {
        Self::new(config, Arc::new(AzureOpenAiClient::new()))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Forward `messages` and return the assistant's reply.
    ///
    /// `messages` is never modified; the system instruction is only added to
    /// the outbound copy.
    pub async fn relay(&self, messages: &[Message]) -> Result<String, RelayError> {
        let deployment = self.config.deployment().inspect_err(|e| {
            if let RelayError::MissingConfiguration(missing) = e {
                error!(?missing, "missing completion service configuration");
            }
        })?;

        let outbound = with_system_instruction(messages);
        let request = CompletionRequest {
            messages: &outbound,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(
            deployment = deployment.name,
            messages = outbound.len(),
            "calling completion API"
        );

        let result = self
            .client
            .complete(&deployment, &request)
            .await
            .and_then(CompletionResponse::into_reply);

        match &result {
            Ok(reply) => debug!(reply_len = reply.len(), "completion received"),
            Err(RelayError::Upstream { status, body }) => {
                error!(status, body = %body, "completion API error");
            }
            Err(RelayError::EmptyCompletion) => error!("completion API returned no choices"),
            Err(RelayError::Unexpected(detail)) => {
                error!(detail = %detail, "error processing completion request");
            }
            Err(RelayError::MissingConfiguration(_)) => {}
        }

        result
    }
}
