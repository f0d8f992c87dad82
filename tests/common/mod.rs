//! Mock provider setup shared by integration tests

#![allow(dead_code)]

use ai_intelligence::engine::Engine;
use ai_intelligence::provider::{Credentials, Provider, ProviderAdapter};
use ai_intelligence::service::ServiceRegistry;
use ai_intelligence::types::{Params, Value};
use mockito::{Mock, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub const OPENAI_KEY: &str = "test-openai-key";
pub const GROQ_KEY: &str = "test-groq-key";

/// Service document used across the integration tests.
pub fn services() -> serde_json::Value {
    json!({
        "summary": {
            "model": "gpt-4o-mini",
            "provider": "openai",
            "type": "v1/completions",
            "params": {
                "text": {"required": true},
                "max_words": {"default": 50}
            },
            "completions": {
                "temperature": 0.5,
                "messages": [
                    {"role": "system", "content": ["Summarize in at most {{params.max_words}} words.", "Return only the summary."]},
                    {"role": "user", "content": ["{{params.text}}"]}
                ],
                "max_tokens": {
                    "value": 10,
                    "add": [{"param": "max_words", "measure": "value", "multiply": 2}],
                    "max": 500
                }
            }
        },
        "extract": {
            "model": "gpt-4o-mini",
            "provider": "openai",
            "type": "completion",
            "params": {
                "text": {"required": true},
                "labels": {"default": ["person", "place"]}
            },
            "completions": {
                "messages": [
                    {"role": "system", "content": "Extract {{params.labels}} from the text."},
                    {"role": "user", "content": "{{params.text}}"}
                ],
                "max_tokens": {"value": 100},
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "extraction",
                        "schema": {
                            "type": "object",
                            "description": "Entities of kind {{params.labels}}"
                        }
                    }
                }
            }
        },
        "describe": {
            "model": "gpt-4o-mini",
            "provider": "openai",
            "type": "completion",
            "params": {"image": {"required": true}},
            "completions": {
                "messages": [{"role": "system", "content": "Describe the attached image."}]
            }
        },
        "embed": {
            "model": "text-embedding-3-small",
            "provider": "openai",
            "type": "embedding",
            "params": {"texts": {"required": true}}
        },
        "moderate": {
            "model": "omni-moderation-latest",
            "provider": "openai",
            "type": "moderation",
            "params": {"text": {"required": true}}
        },
        "draw": {
            "model": "dall-e-3",
            "provider": "openai",
            "type": "image-generation",
            "params": {"prompt": {"required": true}, "count": {"default": 4}},
            "images": {"generations": {"max_count": 1}}
        },
        "chat": {
            "model": "llama-3.1-8b-instant",
            "provider": "groq",
            "type": "completion",
            "params": {"text": {"required": true}},
            "completions": {"messages": [{"role": "user", "content": "{{params.text}}"}]}
        },
        "groq_embed": {
            "model": "nomic-embed",
            "provider": "groq",
            "type": "embedding",
            "params": {"texts": {"required": true}}
        }
    })
}

/// Test fixture that manages a mock provider server
pub struct MockProviderFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockProviderFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Engine over [`services`] with both providers pointed at the mock server.
    pub fn engine(&self) -> Engine {
        let definitions = serde_json::from_value(services()).expect("valid service document");
        let registry = Arc::new(ServiceRegistry::from_definitions(definitions));
        let adapter = ProviderAdapter::builder()
            .credentials(
                Credentials::new()
                    .with_key(Provider::OpenAi, OPENAI_KEY)
                    .with_key(Provider::Groq, GROQ_KEY),
            )
            .base_url(Provider::OpenAi, &self.base_url)
            .base_url(Provider::Groq, &self.base_url)
            .timeout(Duration::from_secs(5))
            .build()
            .expect("adapter builds");
        Engine::new(registry, adapter)
    }

    /// Create a mock for a JSON response
    pub async fn mock_json(&mut self, path: &str, status: usize, body: serde_json::Value) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    pub async fn mock_completion(&mut self, content: &str) -> Mock {
        self.mock_json(
            "/v1/chat/completions",
            200,
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
            }),
        )
        .await
    }
}

pub fn params(raw: serde_json::Value) -> Params {
    match Value::from(raw) {
        Value::Object(map) => map,
        other => panic!("expected an object, got {:?}", other),
    }
}
