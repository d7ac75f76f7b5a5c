//! Fetch planner: turns a parsed Fetch document into gateway requests and,
//! once the gateway has answered, into a connector-ready `Plan`.
//!
//! ```text
//! Document ──FetchQuery::from_document──▶ FetchQuery ──build──▶ SearchRequests
//!                                                                   │ gateway
//! SearchResults (class, then each property) ──assemble──▶ Plan ◀────┘
//! ```
//!
//! Correlation between filters and gateway answers is positional: the
//! requests come out class-first, then properties in declaration order, and
//! `assemble` zips the answers back in that same order.

pub mod builder;
pub mod assemble;

use serde::{Deserialize, Serialize};

use crate::contextionary::SearchResults;
use crate::model::{FilterValue, Kind, Operator};

pub use builder::{build, ClassFilter, FetchQuery, PendingMatch, PropertyFilter, SearchRequests};
pub use assemble::assemble;

/// Connector-ready query plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub kind: Kind,
    pub possible_class_names: SearchResults,
    /// One entry per property filter, in filter order.
    pub properties: Vec<PlanProperty>,
}

/// A resolved property filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProperty {
    pub possible_names: SearchResults,
    pub operator: Operator,
    pub value: FilterValue,
}
