//! Completion service configuration.
//!
//! Values come from the environment. Absence is not an error at load time:
//! it is reported per request by [`RelayConfig::deployment`], before any
//! network I/O.

use std::env;

use super::{Deployment, RelayError};

/// API version sent as the `api-version` query parameter.
pub const DEFAULT_API_VERSION: &str = "2023-05-15";

pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const KEY_VAR: &str = "AZURE_OPENAI_KEY";
pub const DEPLOYMENT_VAR: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const API_VERSION_VAR: &str = "AZURE_OPENAI_API_VERSION";

/// Settings needed to reach the completion deployment.
#[derive(Clone)]
pub struct RelayConfig {
    /// Service base URL, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: Option<String>,
    /// Access key sent in the `api-key` header.
    pub api_key: Option<String>,
    /// Deployment identifier used in the request path.
    pub deployment: Option<String>,
    pub api_version: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl RelayConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                   | Default      |
    /// |----------------------------|--------------|
    /// | `AZURE_OPENAI_ENDPOINT`    | required     |
    /// | `AZURE_OPENAI_KEY`         | required     |
    /// | `AZURE_OPENAI_DEPLOYMENT`  | required     |
    /// | `AZURE_OPENAI_API_VERSION` | `2023-05-15` |
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var(ENDPOINT_VAR).ok(),
            api_key: env::var(KEY_VAR).ok(),
            deployment: env::var(DEPLOYMENT_VAR).ok(),
            api_version: env::var(API_VERSION_VAR)
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
        }
    }

    /// Build a config with all three required values set.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            api_key: Some(api_key.into()),
            deployment: Some(deployment.into()),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Names of the required variables that are unset or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (ENDPOINT_VAR, &self.endpoint),
            (KEY_VAR, &self.api_key),
            (DEPLOYMENT_VAR, &self.deployment),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Borrow the deployment target, or fail with
    /// [`RelayError::MissingConfiguration`] naming what is absent.
    pub fn deployment(&self) -> Result<Deployment<'_>, RelayError> {
        match (&self.endpoint, &self.api_key, &self.deployment) {
            (Some(endpoint), Some(api_key), Some(name))
                if !endpoint.is_empty() && !api_key.is_empty() && !name.is_empty() =>
            {
                Ok(Deployment {
                    endpoint,
                    api_key,
                    name,
                    api_version: &self.api_version,
                })
            }
            _ => Err(RelayError::MissingConfiguration(self.missing())),
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}
