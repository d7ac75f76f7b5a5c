//! Per-request resolution context.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context for one Fetch resolution.
///
/// Clones share the cancellation flag, so the caller can keep a clone and
/// cancel while the resolver holds the other. The resolver checks the flag
/// before every collaborator call; it does not interrupt a call in flight.
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: RequestId,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::with_id(RequestId(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn with_id(id: RequestId) -> Self {
        Self { id, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Mark the request cancelled. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Error::Cancelled)` once the request has been cancelled.
    pub fn check(&self) -> crate::Result<()> {
        if self.is_cancelled() {
            Err(crate::Error::Cancelled(self.id))
        } else {
            Ok(())
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();
        assert!(ctx.check().is_ok());

        handle.cancel();
        handle.cancel();
        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.check(), Err(crate::Error::Cancelled(id)) if id == ctx.id()));
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(RequestContext::new().id(), RequestContext::new().id());
    }
}
