//! # Storage Connector Trait
//!
//! The contract between the Fetch resolver and the storage layer that turns
//! a resolved `Plan` into rows. Certainty and operator semantics belong to
//! the connector; the resolver neither filters nor re-ranks what comes back.
//!
//! ## Implementations
//!
//! | Connector | Module | Description |
//! |-----------|--------|-------------|
//! | `MemoryConnector` | `memory` | In-memory objects for testing/embedding |

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::planner::Plan;
use crate::Result;

pub use memory::{MemoryConnector, StoredObject};

// ============================================================================
// Result rows
// ============================================================================

/// One untyped row returned by a connector.
///
/// Always carries `beacon` and `certainty`; connectors may add more keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRow {
    pub values: Map<String, JsonValue>,
}

impl ResultRow {
    pub fn new(beacon: impl Into<String>, certainty: f64) -> Self {
        Self::default()
            .with("beacon", beacon.into())
            .with("certainty", certainty)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn beacon(&self) -> Option<&str> {
        self.get("beacon").and_then(JsonValue::as_str)
    }

    pub fn certainty(&self) -> Option<f64> {
        self.get("certainty").and_then(JsonValue::as_f64)
    }
}

// ============================================================================
// StorageConnector Trait
// ============================================================================

/// Executes a resolved Fetch plan.
///
/// Implementations must be safe under concurrent independent calls.
/// Failures are reported as `Error::Connector` and reach the caller verbatim.
#[async_trait]
pub trait StorageConnector: Send + Sync + 'static {
    /// Fetch the rows of `plan.kind` whose class and properties match the plan.
    async fn local_fetch_kind_class(&self, plan: &Plan) -> Result<Vec<ResultRow>>;
}

#[async_trait]
impl<C: StorageConnector + ?Sized> StorageConnector for Arc<C> {
    async fn local_fetch_kind_class(&self, plan: &Plan) -> Result<Vec<ResultRow>> {
        (**self).local_fetch_kind_class(plan).await
    }
}
