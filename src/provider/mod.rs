//! 厂商适配层：端点解析、鉴权与 HTTP 交换。
//!
//! # Provider Adapter
//!
//! Resolves a `(provider, operation)` pair to an endpoint, attaches the provider's
//! credential and performs the HTTP exchange. The adapter never interprets
//! operation-specific response shapes; it hands a generic JSON document to the
//! normalizer.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapter`] | [`ProviderAdapter`]: POST with timeout, structured error extraction |
//! | [`credentials`] | Per-provider API keys resolved from the process environment |

pub mod adapter;
pub mod credentials;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operation::OperationKind;
use crate::{Error, Result};

pub use adapter::{ProviderAdapter, ProviderAdapterBuilder};
pub use credentials::Credentials;

/// Supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(alias = "open_ai")]
    OpenAi,
    Groq,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Groq];

    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Environment variable holding this provider's API key (`<PROVIDER>_API_KEY`).
    pub fn credential_env_var(&self) -> String {
        format!("{}_API_KEY", self.id().to_uppercase())
    }

    /// Endpoint path for an operation, relative to the provider base URL.
    pub fn endpoint_path(&self, operation: OperationKind) -> Result<&'static str> {
        match (self, operation) {
            (Self::OpenAi, OperationKind::Completion) => Ok("/chat/completions"),
            (Self::OpenAi, OperationKind::Embedding) => Ok("/embeddings"),
            (Self::OpenAi, OperationKind::Moderation) => Ok("/moderations"),
            (Self::OpenAi, OperationKind::ImageGeneration) => Ok("/images/generations"),
            (Self::Groq, OperationKind::Completion) => Ok("/chat/completions"),
            (Self::Groq, OperationKind::Embedding)
            | (Self::Groq, OperationKind::Moderation)
            | (Self::Groq, OperationKind::ImageGeneration) => Err(Error::Unsupported {
                provider: self.id().to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    /// Fixed endpoint URL for an operation on the provider's public API.
    pub fn endpoint_url(&self, operation: OperationKind) -> Result<String> {
        Ok(format!("{}{}", self.default_base_url(), self.endpoint_path(operation)?))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_endpoints() {
        assert_eq!(
            Provider::OpenAi.endpoint_url(OperationKind::Completion).unwrap(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            Provider::OpenAi.endpoint_url(OperationKind::ImageGeneration).unwrap(),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn test_unsupported_combination() {
        let err = Provider::Groq.endpoint_url(OperationKind::Embedding).unwrap_err();
        assert_eq!(err.to_string(), "unsupported provider/operation: groq/embedding");
    }

    #[test]
    fn test_credential_variable() {
        assert_eq!(Provider::OpenAi.credential_env_var(), "OPENAI_API_KEY");
        let p: Provider = serde_json::from_str("\"groq\"").unwrap();
        assert_eq!(p, Provider::Groq);
    }
}
