//! # ai-intelligence
//!
//! 声明式 AI 调度引擎：将具名、带参数的"智能请求"转换为对外部 AI 服务的调用。
//!
//! Declarative dispatch engine that turns named, parameterized intelligence
//! requests into calls against hosted AI APIs (chat completion, embeddings,
//! moderation, image generation).
//!
//! ## Overview
//!
//! Each logical *service* is described in a configuration document instead of
//! code: its model, provider, operation kind, declared parameters, and (for
//! completions) message templates, a dynamic token budget and an optional
//! structured-output schema. A request names a service and supplies a
//! parameter bag; the engine validates the bag, expands the templates, calls the
//! provider and normalizes the response.
//!
//! Batches of named requests run concurrently, one task per entry, with failures
//! isolated per entry name.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_intelligence::engine::{Engine, RequestContext};
//! use ai_intelligence::provider::{Credentials, ProviderAdapter};
//! use ai_intelligence::service::ServiceRegistry;
//! use ai_intelligence::types::{Params, Value};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ai_intelligence::Result<()> {
//!     let registry = Arc::new(ServiceRegistry::new());
//!     registry.load("intelligence.json").await?;
//!
//!     let adapter = ProviderAdapter::builder()
//!         .credentials(Credentials::from_env(&registry.providers())?)
//!         .build()?;
//!     let engine = Engine::new(registry, adapter);
//!
//!     let mut params = Params::new();
//!     params.insert("text".to_string(), Value::from("A long article..."));
//!     let summary = engine
//!         .get_intelligence(&RequestContext::new(), "summary", &params)
//!         .await?;
//!     println!("{}", serde_json::to_string(&summary)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`service`] | Service definitions, document loading, hot-reloadable registry |
//! | [`params`] | Required/default parameter preparation |
//! | [`template`] | Placeholder expansion, attachments, token budgets, schemas |
//! | [`operation`] | Operation kinds and provider request bodies |
//! | [`provider`] | Endpoints, credentials and the HTTP exchange |
//! | [`normalize`] | Canonical results per operation kind |
//! | [`ingest`] | JSON and multipart request parsing |
//! | [`batch`] | Concurrent fan-out with per-entry error isolation |
//! | [`engine`] | Single-request entry point and request context |
//! | [`server`] | axum router for the HTTP surface |

pub mod batch;
pub mod config;
pub mod engine;
pub mod ingest;
pub mod normalize;
pub mod operation;
pub mod params;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod service;
pub mod template;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use batch::{Batch, BatchOutcome};
pub use engine::{Engine, RequestContext};
pub use normalize::Intelligence;
pub use operation::OperationKind;
pub use provider::Provider;
pub use resolver::FieldResolver;
pub use service::{ServiceDefinition, ServiceRegistry};
pub use types::{Blob, Params, Value};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
