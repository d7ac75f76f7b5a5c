//! # Semantic Search Gateway
//!
//! The contract between the Fetch resolver and the vector-similarity
//! index (the "contextionary") that ranks schema element names against a
//! natural-language term.
//!
//! ## Implementations
//!
//! | Gateway | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryGateway` | `memory` | Trigram similarity over registered names, for tests/embedding |

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

pub use memory::MemoryGateway;

// ============================================================================
// Request / response types
// ============================================================================

/// Which part of the schema a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchType {
    Class,
    Property,
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchType::Class => f.write_str("class"),
            SearchType::Property => f.write_str("property"),
        }
    }
}

/// A weighted hint term supplied alongside the searched name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub weight: f64,
}

impl Keyword {
    pub fn new(keyword: impl Into<String>, weight: f64) -> Self {
        Self { keyword: keyword.into(), weight }
    }
}

/// One gateway request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_type: SearchType,
    pub name: String,
    pub certainty: f64,
    pub keywords: Vec<Keyword>,
}

impl SearchParams {
    pub fn new(search_type: SearchType, name: impl Into<String>, certainty: f64) -> Self {
        Self { search_type, name: name.into(), certainty, keywords: Vec::new() }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>, weight: f64) -> Self {
        self.keywords.push(Keyword::new(keyword, weight));
        self
    }

    /// Range checks every gateway applies before searching.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.certainty) {
            return Err(Error::Gateway(format!(
                "certainty must be within [0, 1], got {}",
                self.certainty
            )));
        }
        if let Some(k) = self.keywords.iter().find(|k| !(0.0..=1.0).contains(&k.weight)) {
            return Err(Error::Gateway(format!(
                "weight of keyword '{}' must be within [0, 1], got {}",
                k.keyword, k.weight
            )));
        }
        Ok(())
    }
}

/// A ranked candidate name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub certainty: f64,
}

impl SearchResult {
    pub fn new(name: impl Into<String>, certainty: f64) -> Self {
        Self { name: name.into(), certainty }
    }
}

/// Candidates for one request, highest certainty first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "type")]
    pub search_type: SearchType,
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    /// Build a result set, sorting by descending certainty (ties by name).
    pub fn new(search_type: SearchType, mut results: Vec<SearchResult>) -> Self {
        results.sort_by(|a, b| {
            b.certainty.total_cmp(&a.certainty).then_with(|| a.name.cmp(&b.name))
        });
        Self { search_type, results }
    }

    pub fn empty(search_type: SearchType) -> Self {
        Self { search_type, results: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Certainty of `name` in this result set, if it is a candidate.
    pub fn certainty_of(&self, name: &str) -> Option<f64> {
        self.results.iter().find(|r| r.name == name).map(|r| r.certainty)
    }
}

// ============================================================================
// SemanticSearchGateway Trait
// ============================================================================

/// Ranks schema element names against a search term.
///
/// Implementations must be safe under concurrent independent calls. An
/// empty result set is a valid answer, not an error.
#[async_trait]
pub trait SemanticSearchGateway: Send + Sync + 'static {
    /// Search the class or property names of the schema.
    ///
    /// Fails with `Error::Gateway` when the index is unreachable or the
    /// params are out of range.
    async fn schema_search(&self, params: &SearchParams) -> Result<SearchResults>;
}

#[async_trait]
impl<G: SemanticSearchGateway + ?Sized> SemanticSearchGateway for Arc<G> {
    async fn schema_search(&self, params: &SearchParams) -> Result<SearchResults> {
        (**self).schema_search(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_sorted_descending() {
        let results = SearchResults::new(SearchType::Class, vec![
            SearchResult::new("b", 0.85),
            SearchResult::new("a", 0.95),
            SearchResult::new("c", 0.85),
        ]);
        let names: Vec<_> = results.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(results.certainty_of("c"), Some(0.85));
        assert_eq!(results.certainty_of("z"), None);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(SearchParams::new(SearchType::Class, "x", 0.0).validate().is_ok());
        assert!(SearchParams::new(SearchType::Class, "x", 1.0).validate().is_ok());
        assert!(matches!(
            SearchParams::new(SearchType::Class, "x", 1.2).validate(),
            Err(Error::Gateway(_))
        ));
        assert!(SearchParams::new(SearchType::Property, "x", 0.5)
            .with_keyword("k", -0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_nan_certainty_rejected() {
        assert!(SearchParams::new(SearchType::Class, "x", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_results_serialize_with_type_key() {
        let json = serde_json::to_value(SearchResults::empty(SearchType::Property)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Property", "results": []}));
    }
}
