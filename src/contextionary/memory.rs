//! In-memory semantic search gateway.
//!
//! Reference implementation of `SemanticSearchGateway`. Instead of word
//! vectors it scores candidates by character-trigram overlap, which is
//! enough to exercise the resolver end to end.
//!
//! ## Scoring
//!
//! `score(candidate) = max(sim(name, candidate), max_k weight_k * sim(keyword_k, candidate))`
//!
//! where `sim` is the Jaccard index of the two padded, lower-cased trigram
//! sets. Keywords can only raise a candidate's score.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hashbrown::HashSet;
use parking_lot::RwLock;

use crate::config::GatewayConfig;
use crate::model::Schema;
use crate::{Error, Result};
use super::{SearchParams, SearchResult, SearchResults, SearchType, SemanticSearchGateway};

/// In-memory gateway over registered class and property names.
#[derive(Clone)]
pub struct MemoryGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    classes: RwLock<Vec<String>>,
    properties: RwLock<Vec<String>>,
    reachable: AtomicBool,
    config: GatewayConfig,
}

impl MemoryGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(GatewayInner {
                classes: RwLock::new(Vec::new()),
                properties: RwLock::new(Vec::new()),
                reachable: AtomicBool::new(true),
                config,
            }),
        })
    }

    /// Register every class and property name declared in `schema`.
    pub fn from_schema(schema: &Schema, config: GatewayConfig) -> Result<Self> {
        let gateway = Self::new(config)?;
        for collection in [&schema.actions, &schema.things].into_iter().flatten() {
            for class in &collection.classes {
                gateway.register(SearchType::Class, &class.class);
                for property in &class.properties {
                    gateway.register(SearchType::Property, &property.name);
                }
            }
        }
        Ok(gateway)
    }

    /// Add a candidate name. Re-registering a name is a no-op.
    pub fn register(&self, search_type: SearchType, name: &str) {
        let mut names = self.names(search_type).write();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// Simulate the index going away (or coming back).
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.reachable.store(reachable, Ordering::Release);
    }

    fn names(&self, search_type: SearchType) -> &RwLock<Vec<String>> {
        match search_type {
            SearchType::Class => &self.inner.classes,
            SearchType::Property => &self.inner.properties,
        }
    }

    fn score(params: &SearchParams, candidate: &str) -> f64 {
        let candidate = trigrams(candidate);
        params.keywords.iter().fold(
            similarity(&trigrams(&params.name), &candidate),
            |best, k| best.max(k.weight * similarity(&trigrams(&k.keyword), &candidate)),
        )
    }
}

#[async_trait]
impl SemanticSearchGateway for MemoryGateway {
    async fn schema_search(&self, params: &SearchParams) -> Result<SearchResults> {
        if !self.inner.reachable.load(Ordering::Acquire) {
            return Err(Error::Gateway("semantic index unreachable".into()));
        }
        params.validate()?;

        let threshold = params.certainty.max(self.inner.config.min_certainty);
        let candidates: Vec<SearchResult> = self
            .names(params.search_type)
            .read()
            .iter()
            .map(|name| SearchResult::new(name.clone(), Self::score(params, name)))
            .filter(|r| r.certainty >= threshold)
            .collect();

        let mut results = SearchResults::new(params.search_type, candidates);
        results.results.truncate(self.inner.config.max_results);
        Ok(results)
    }
}

// ============================================================================
// Trigram similarity
// ============================================================================

fn trigrams(s: &str) -> HashSet<[char; 3]> {
    let padded: Vec<char> = "  ".chars()
        .chain(s.to_lowercase().chars())
        .chain(" ".chars())
        .collect();
    padded.windows(3).map(|w| [w[0], w[1], w[2]]).collect()
}

fn similarity(a: &HashSet<[char; 3]>, b: &HashSet<[char; 3]>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
