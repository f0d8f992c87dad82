//! Batch executor.

use futures::future::join_all;
use tracing::debug;

use super::{model_of, Batch, BatchOutcome};
use crate::engine::{Engine, RequestContext};
use crate::normalize::Intelligence;
use crate::types::Params;
use crate::Result;

/// Run every entry of `batch` as its own task and wait for all of them.
///
/// Entries never observe each other's failures: each one ends up in exactly
/// one of the outcome's maps under its own name.
pub async fn execute(engine: &Engine, ctx: &RequestContext, batch: Batch) -> BatchOutcome {
    let mut names = Vec::with_capacity(batch.len());
    let mut handles = Vec::with_capacity(batch.len());
    for (name, params) in batch {
        debug!(entry = name.as_str(), state = "pending");
        let engine = engine.clone();
        let ctx = ctx.clone();
        let entry = name.clone();
        let handle =
            tokio::spawn(async move { run_entry(&engine, &ctx, &entry, &params).await });
        names.push(name);
        handles.push(handle);
    }

    let mut outcome = BatchOutcome::new();
    for (name, joined) in names.into_iter().zip(join_all(handles).await) {
        match joined {
            Ok(Ok(result)) => {
                debug!(entry = name.as_str(), state = "succeeded");
                outcome.add_success(name, result);
            }
            Ok(Err(e)) => {
                debug!(entry = name.as_str(), state = "failed", error = %e);
                outcome.add_failure(name, e.to_string());
            }
            Err(join_error) => {
                debug!(entry = name.as_str(), state = "failed", error = %join_error);
                outcome.add_failure(name, format!("request task failed: {}", join_error));
            }
        }
    }
    outcome
}

async fn run_entry(
    engine: &Engine,
    ctx: &RequestContext,
    entry: &str,
    params: &Params,
) -> Result<Intelligence> {
    let model = model_of(params)?;
    debug!(entry, model, state = "in-flight");
    engine.get_intelligence(ctx, model, params).await
}
