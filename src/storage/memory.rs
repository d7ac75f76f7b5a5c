//! In-memory storage connector.
//!
//! This is the reference implementation of `StorageConnector`. Objects live
//! in a `Vec` behind a `RwLock` and every fetch is a full scan.
//!
//! ## Matching
//!
//! An object of the plan's kind matches when its class is one of
//! `possible_class_names` and, for every plan property, at least one of the
//! property's possible names holds a value for which the operator is true.
//! The row certainty is the lowest certainty among the class candidate and
//! the best matching candidate of each property. Rows come back in
//! insertion order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::FetchConfig;
use crate::model::{Beacon, FilterValue, Kind};
use crate::planner::{Plan, PlanProperty};
use crate::{Error, Result};
use super::{ResultRow, StorageConnector};

/// An object held by the in-memory connector.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub kind: Kind,
    pub class: String,
    pub id: String,
    pub properties: HashMap<String, FilterValue>,
}

impl StoredObject {
    pub fn new(kind: Kind, class: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            class: class.into(),
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// In-memory object storage answering Fetch plans.
#[derive(Clone)]
pub struct MemoryConnector {
    inner: Arc<ConnectorInner>,
}

struct ConnectorInner {
    peer_name: String,
    objects: RwLock<Vec<StoredObject>>,
    /// When set, every fetch fails with this message.
    failure: RwLock<Option<String>>,
}

impl MemoryConnector {
    pub fn new(peer_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ConnectorInner {
                peer_name: peer_name.into(),
                objects: RwLock::new(Vec::new()),
                failure: RwLock::new(None),
            }),
        }
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.peer_name.clone()))
    }

    /// Store an object and return its beacon.
    pub fn insert(&self, object: StoredObject) -> Beacon {
        let beacon = Beacon::new(self.inner.peer_name.clone(), object.kind, object.id.clone());
        self.inner.objects.write().push(object);
        beacon
    }

    pub fn len(&self) -> usize {
        self.inner.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent fetches fail (`Some`) or succeed again (`None`).
    pub fn set_failure(&self, message: Option<String>) {
        *self.inner.failure.write() = message;
    }

    fn match_object(&self, plan: &Plan, object: &StoredObject) -> Option<ResultRow> {
        if object.kind != plan.kind {
            return None;
        }
        let mut certainty = plan.possible_class_names.certainty_of(&object.class)?;
        for property in &plan.properties {
            certainty = certainty.min(best_property_match(property, object)?);
        }
        let beacon = Beacon::new(self.inner.peer_name.clone(), object.kind, object.id.clone());
        Some(ResultRow::new(beacon.to_string(), certainty))
    }
}

/// Highest certainty among the property's candidates that satisfy the filter.
fn best_property_match(property: &PlanProperty, object: &StoredObject) -> Option<f64> {
    property
        .possible_names
        .results
        .iter()
        .filter(|candidate| {
            object
                .properties
                .get(&candidate.name)
                .is_some_and(|stored| property.operator.matches(stored.compare(&property.value)))
        })
        .map(|candidate| candidate.certainty)
        .reduce(f64::max)
}

#[async_trait]
impl StorageConnector for MemoryConnector {
    async fn local_fetch_kind_class(&self, plan: &Plan) -> Result<Vec<ResultRow>> {
        if let Some(message) = self.inner.failure.read().clone() {
            return Err(Error::Connector(message));
        }
        let objects = self.inner.objects.read();
        Ok(objects.iter().filter_map(|o| self.match_object(plan, o)).collect())
    }
}
