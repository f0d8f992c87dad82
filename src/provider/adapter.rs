use reqwest::Proxy;
use std::collections::HashMap;
use std::env;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use super::{Credentials, Provider};
use crate::operation::OperationKind;
use crate::service::ServiceDefinition;
use crate::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Performs provider HTTP exchanges for resolved services.
pub struct ProviderAdapter {
    client: reqwest::Client,
    credentials: Credentials,
    base_urls: HashMap<Provider, String>,
}

impl ProviderAdapter {
    pub fn builder() -> ProviderAdapterBuilder {
        ProviderAdapterBuilder::new()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve `(provider, operation)` to the endpoint URL, honoring base URL overrides.
    pub fn endpoint_url(&self, provider: Provider, operation: OperationKind) -> Result<String> {
        let path = provider.endpoint_path(operation)?;
        let base = self
            .base_urls
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_base_url());
        Ok(format!("{}{}", base.trim_end_matches('/'), path))
    }

    /// POST `body` to the service's endpoint and decode the JSON response.
    ///
    /// Non-2xx responses become [`Error::Provider`] carrying the message extracted
    /// from the provider's error envelope, or the raw body when there is none.
    pub async fn send(
        &self,
        service: &ServiceDefinition,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint_url(service.provider, service.operation)?;
        let api_key = self.credentials.require(service.provider)?;
        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            // Our own correlation id. Providers may ignore it.
            .header("x-request-id", &client_request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport {
                service: service.name.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        service = service.name.as_str(),
                        http_status = status.as_u16(),
                        error = %e,
                        "cannot read provider error body"
                    );
                    String::new()
                }
            };
            let message = extract_error_message(&raw).unwrap_or_else(|| {
                if raw.trim().is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    raw
                }
            });
            warn!(
                service = service.name.as_str(),
                provider = service.provider.id(),
                operation = service.operation.as_str(),
                http_status = status.as_u16(),
                request_id = client_request_id.as_str(),
                duration_ms = start.elapsed().as_millis() as u64,
                "provider request failed"
            );
            return Err(Error::Provider {
                service: service.name.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let json = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::Transport {
                service: service.name.clone(),
                source: e,
            })?;

        info!(
            service = service.name.as_str(),
            provider = service.provider.id(),
            operation = service.operation.as_str(),
            http_status = status.as_u16(),
            request_id = client_request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "provider request completed"
        );
        Ok(json)
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Understands `{"error": {"message": ".."}}`, `{"error": ".."}` and `{"message": ".."}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    if let Some(error) = json.get("error") {
        if let Some(msg) = error.get("message").and_then(|m| m.as_str()) {
            return Some(msg.to_string());
        }
        if let Some(msg) = error.as_str() {
            return Some(msg.to_string());
        }
    }
    json.get("message")
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

pub struct ProviderAdapterBuilder {
    credentials: Credentials,
    base_urls: HashMap<Provider, String>,
    timeout: Option<Duration>,
}

impl ProviderAdapterBuilder {
    pub fn new() -> Self {
        Self {
            credentials: Credentials::new(),
            base_urls: HashMap::new(),
            timeout: None,
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override a provider's base URL (the part before `/chat/completions` etc.).
    pub fn base_url(mut self, provider: Provider, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ProviderAdapter> {
        // Minimal production-friendly defaults (env-overridable).
        let timeout = self.timeout.unwrap_or_else(|| {
            Duration::from_secs(
                env::var("AI_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            )
        });

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("AI_PROXY_URL") {
            let proxy = Proxy::all(&proxy_url).map_err(|e| {
                Error::configuration(format!("invalid AI_PROXY_URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(ProviderAdapter {
            client,
            credentials: self.credentials,
            base_urls: self.base_urls,
        })
    }
}

impl Default for ProviderAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_openai_error_envelope() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(
            extract_error_message(r#"{"error": "rate limited"}"#).as_deref(),
            Some("rate limited")
        );
        assert!(extract_error_message("<html>Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_base_url_override() {
        let adapter = ProviderAdapter::builder()
            .base_url(Provider::OpenAi, "http://127.0.0.1:9999/v1/")
            .build()
            .unwrap();
        assert_eq!(
            adapter
                .endpoint_url(Provider::OpenAi, OperationKind::Embedding)
                .unwrap(),
            "http://127.0.0.1:9999/v1/embeddings"
        );
        assert_eq!(
            adapter
                .endpoint_url(Provider::Groq, OperationKind::Completion)
                .unwrap(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
