//! 调度引擎：单请求执行与批量并发分发的入口。
//!
//! # Engine
//!
//! [`Engine::get_intelligence`] runs one request through every stage:
//! registry lookup, parameter preparation, request body expansion, the provider
//! call and response normalization. [`Engine::execute_batch`] fans a whole
//! [`Batch`] out over the same path.

pub mod context;

use std::sync::Arc;

use crate::batch::{self, Batch, BatchOutcome};
use crate::normalize::{normalize, Intelligence};
use crate::operation::build_request_body;
use crate::params::prepare_params;
use crate::provider::ProviderAdapter;
use crate::service::{ServiceDefinition, ServiceRegistry};
use crate::types::Params;
use crate::Result;

pub use context::RequestContext;

/// Shared, cheaply cloneable handle over the registry and provider adapter.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<ServiceRegistry>,
    adapter: Arc<ProviderAdapter>,
}

impl Engine {
    pub fn new(registry: Arc<ServiceRegistry>, adapter: ProviderAdapter) -> Self {
        Self {
            registry,
            adapter: Arc::new(adapter),
        }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn adapter(&self) -> &ProviderAdapter {
        &self.adapter
    }

    /// Resolve `model` and build the provider request body without sending it.
    pub fn prepare_request(
        &self,
        model: &str,
        params: &Params,
    ) -> Result<(Arc<ServiceDefinition>, serde_json::Value)> {
        let service = self.registry.lookup(model)?;
        let prepared = prepare_params(&service, params)?;
        let body = build_request_body(&service, &prepared)?;
        Ok((service, body))
    }

    /// Execute a single intelligence request.
    ///
    /// Parameter and lookup errors are returned before any provider call is
    /// made. The provider call itself is bounded by `ctx`.
    pub async fn get_intelligence(
        &self,
        ctx: &RequestContext,
        model: &str,
        params: &Params,
    ) -> Result<Intelligence> {
        let (service, body) = self.prepare_request(model, params)?;
        let response = ctx
            .run(&service.name, self.adapter.send(&service, &body))
            .await?;
        normalize(service.operation, &response)
    }

    /// Execute every entry of `batch` concurrently.
    pub async fn execute_batch(&self, ctx: &RequestContext, batch: Batch) -> BatchOutcome {
        batch::execute(self, ctx, batch).await
    }
}
