//! # fetch-resolver: Fuzzy Fetch Resolution for a Federated Graph
//!
//! Resolves `Fetch` queries that name classes and properties only
//! approximately. Names are ranked by a semantic search gateway, the ranked
//! candidates become a query plan, a storage connector turns the plan into
//! rows, and the rows are projected into the requested response shape.
//!
//! Also extracts the network classes (`<Peer>/<Class>`) a local schema
//! references, which federated fetches need before dereferencing beacons.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SemanticSearchGateway` and `StorageConnector` are the
//!    only seams to the outside; both are injected at construction
//! 2. **Strict ordering**: class search, then property searches in
//!    declaration order, then one connector call, never concurrently
//! 3. **All or nothing**: any failure aborts the resolution with no partial
//!    plan or partial rows
//! 4. **Parser owns nothing**: query text → AST is a pure function
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fetch_resolver::{
//!     FetchConfig, Kind, MemoryConnector, MemoryGateway, RequestContext,
//!     Resolver, SearchType, StoredObject,
//! };
//!
//! # async fn example() -> fetch_resolver::Result<()> {
//! let config = FetchConfig::default();
//! let gateway = MemoryGateway::new(config.gateway.clone())?;
//! gateway.register(SearchType::Class, "City");
//!
//! let connector = MemoryConnector::from_config(&config)?;
//! connector.insert(StoredObject::new(Kind::Thing, "City", "uuid1"));
//!
//! let resolver = Resolver::new(gateway, connector);
//! let result = resolver.resolve(&RequestContext::new(), r#"{
//!     Fetch { Things(where: { class: { name: "city", certainty: 0.8 } }) { beacon certainty } }
//! }"#).await?;
//!
//! println!("{:?}", result.get(&["Fetch", "Things"]));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod query;
pub mod planner;
pub mod contextionary;
pub mod storage;
pub mod execution;
pub mod network;
pub mod context;
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Schema, SemanticSchema, Class, Property, Kind,
    NetworkClass, Beacon, FilterValue, Operator,
};

pub use contextionary::{
    SemanticSearchGateway, MemoryGateway,
    SearchType, SearchParams, SearchResult, SearchResults, Keyword,
};

pub use storage::{StorageConnector, MemoryConnector, StoredObject, ResultRow};

pub use planner::{FetchQuery, Plan, PlanProperty, SearchRequests};

pub use execution::{QueryResult, SelectedField};

pub use network::extract_network_classes;

pub use context::{RequestContext, RequestId};

pub use config::{FetchConfig, GatewayConfig};

// ============================================================================
// Resolver
// ============================================================================

/// The primary entry point. A `Resolver` owns its gateway and connector and
/// resolves Fetch queries against them.
///
/// Holds no per-request state, so one resolver can serve concurrent
/// requests.
pub struct Resolver<G: SemanticSearchGateway, C: StorageConnector> {
    gateway: G,
    connector: C,
}

impl<G: SemanticSearchGateway, C: StorageConnector> Resolver<G, C> {
    pub fn new(gateway: G, connector: C) -> Self {
        Self { gateway, connector }
    }

    /// Parse and resolve a Fetch query.
    pub async fn resolve(&self, ctx: &RequestContext, query: &str) -> Result<QueryResult> {
        let doc = query::parse(query)?;
        let fetch = FetchQuery::from_document(&doc)?;
        self.resolve_query(ctx, &fetch).await
    }

    /// Resolve an already validated Fetch query.
    pub async fn resolve_query(&self, ctx: &RequestContext, fetch: &FetchQuery) -> Result<QueryResult> {
        let result = self.run(ctx, fetch).await;
        match &result {
            Ok(r) => tracing::info!(
                request = %ctx.id(),
                kind = %fetch.kind,
                property_filters = fetch.properties.len(),
                rows = r.row_count,
                "fetch resolved"
            ),
            Err(e) if e.is_internal() => tracing::error!(request = %ctx.id(), error = %e, "fetch aborted"),
            Err(e) => tracing::warn!(request = %ctx.id(), error = %e, "fetch aborted"),
        }
        result
    }

    /// Build the plan only: parse, then run every gateway call.
    pub async fn plan(&self, ctx: &RequestContext, query: &str) -> Result<Plan> {
        let doc = query::parse(query)?;
        let fetch = FetchQuery::from_document(&doc)?;
        self.resolve_plan(ctx, &fetch).await
    }

    async fn run(&self, ctx: &RequestContext, fetch: &FetchQuery) -> Result<QueryResult> {
        let plan = self.resolve_plan(ctx, fetch).await?;

        ctx.check()?;
        let rows = self.connector.local_fetch_kind_class(&plan).await?;

        execution::project(&rows, &fetch.selection, &fetch.path)
    }

    async fn resolve_plan(&self, ctx: &RequestContext, fetch: &FetchQuery) -> Result<Plan> {
        let requests = planner::build(fetch);

        let class_results = self.search(ctx, &requests.class).await?;
        let mut property_results = Vec::with_capacity(requests.properties.len());
        for params in &requests.properties {
            property_results.push(self.search(ctx, params).await?);
        }

        planner::assemble(fetch.kind, class_results, property_results, requests.matches)
    }

    async fn search(&self, ctx: &RequestContext, params: &SearchParams) -> Result<SearchResults> {
        ctx.check()?;
        let results = self.gateway.schema_search(params).await?;
        tracing::debug!(
            request = %ctx.id(),
            search_type = %params.search_type,
            name = %params.name,
            certainty = params.certainty,
            candidates = results.len(),
            "schema search"
        );
        Ok(results)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Query syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Semantic search gateway error: {0}")]
    Gateway(String),

    #[error("Internal coordination error: {got} property search results for {expected} property filters")]
    Coordination { expected: usize, got: usize },

    #[error("Storage connector error: {0}")]
    Connector(String),

    #[error("Unknown field '{0}' requested, expected one of: beacon, certainty")]
    UnknownField(String),

    #[error("Request {0} was cancelled")]
    Cancelled(RequestId),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors that can only come from a bug in this crate.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Coordination { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
