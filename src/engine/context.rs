//! Per-call cancellation and deadline.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{Error, Result};

/// Cancellation and deadline shared by every entry of one inbound call.
///
/// Clones share the same token, so cancelling any clone stops every
/// outstanding provider call started under it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Guard that cancels the context when dropped. The HTTP handler holds one
    /// so a client disconnect, which drops the handler future, stops
    /// in-flight provider calls.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.cancel.clone().drop_guard()
    }

    /// Run `fut` unless the context is cancelled or its deadline passes first.
    /// `service` names the call in the resulting [`Error::Cancelled`].
    pub async fn run<F, T>(&self, service: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled(service.to_string()));
        }
        let guarded = async {
            tokio::select! {
                _ = self.cancel.cancelled() => Err(Error::Cancelled(service.to_string())),
                out = fut => out,
            }
        };
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or_else(|_| Err(Error::Cancelled(service.to_string()))),
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_future_is_unaffected() {
        let ctx = RequestContext::new();
        let out = ctx.run("svc", async { Ok::<_, Error>(7) }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn test_cancel_stops_pending_call() {
        let ctx = RequestContext::new();
        let child = ctx.clone();
        let handle = tokio::spawn(async move {
            child
                .run("svc", async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, Error>(())
                })
                .await
        });
        tokio::task::yield_now().await;
        ctx.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "request to 'svc' service was cancelled");
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(10));
        let err = ctx
            .run("svc", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, Error>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[tokio::test]
    async fn test_drop_guard_cancels() {
        let ctx = RequestContext::new();
        {
            let _guard = ctx.cancel_on_drop();
        }
        assert!(ctx.is_cancelled());
    }
}
