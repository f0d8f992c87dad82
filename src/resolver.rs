//! Resolver seam for query layers that map a field to a service call.

use async_trait::async_trait;

use crate::engine::{Engine, RequestContext};
use crate::normalize::Intelligence;
use crate::types::Params;
use crate::Result;

/// Resolves one query field: the field name selects a service, the field's
/// arguments become its parameter bag.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        field_name: &str,
        arguments: &Params,
    ) -> Result<Intelligence>;
}

#[async_trait]
impl FieldResolver for Engine {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        field_name: &str,
        arguments: &Params,
    ) -> Result<Intelligence> {
        self.get_intelligence(ctx, field_name, arguments).await
    }
}
