//! Planner session: the shared catalog, the hangar provider and plan storage
//! wired together from one [`PlannerConfig`].

use std::sync::Arc;

use crate::catalog::cache::{CatalogCache, SharedCatalog};
use crate::catalog::loader::{load_catalog, CatalogSource, LoadSummary};
use crate::config::PlannerConfig;
use crate::error::{CatalogError, InvalidPathError, PlannerError};
use crate::graph::model::NodeId;
use crate::graph::plan::{PathGraph, PlanPath};
use crate::hangar::provider::HangarPriceProvider;
use crate::hangar::store::{FileStore, KeyValueStore};
use crate::logging::structured::{init_logger, LogContext};
use crate::pricing::resolver::{PathCost, PathCostResolver, StartPrices};

/// Storage key prefix for saved plans.
pub const PLAN_KEY_PREFIX: &str = "ccuPlan-";

pub struct Planner {
    config: PlannerConfig,
    catalog: SharedCatalog,
    hangar: Arc<HangarPriceProvider>,
    store: Arc<dyn KeyValueStore>,
}

impl Planner {
    /// File-backed planner rooted at `config.storage_dir`.
    pub fn new(config: PlannerConfig) -> Self {
        init_logger(config.log_level);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_dir));
        Self::with_store(config, store)
    }

    pub fn with_store(config: PlannerConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let hangar = Arc::new(HangarPriceProvider::new(store.clone()));
        crate::log_info!(
            LogContext::catalog(),
            "PLANNER_READY",
            storage = config.storage_dir,
            catalog_ttl_secs = config.catalog_ttl.as_secs(),
        );
        Self {
            config,
            catalog: CatalogCache::shared(),
            hangar,
            store,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }

    pub fn hangar(&self) -> Arc<HangarPriceProvider> {
        self.hangar.clone()
    }

    /// Fetch a fresh catalog and swap it in. On failure the current
    /// catalog stays in place.
    pub fn refresh_catalog<S: CatalogSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<LoadSummary, CatalogError> {
        let mut fresh = CatalogCache::new();
        let summary = load_catalog(source, &mut fresh)?;
        *self.catalog.write() = fresh;
        Ok(summary)
    }

    /// Refresh only when the catalog is missing or older than the TTL.
    pub fn refresh_if_stale<S: CatalogSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Option<LoadSummary>, CatalogError> {
        let (stale, age) = self.cache_status();
        if !stale {
            crate::log_debug!(LogContext::catalog(), "CATALOG_FRESH", age_secs = age);
            return Ok(None);
        }
        self.refresh_catalog(source).map(Some)
    }

    /// Returns (needs_refresh, age_secs).
    pub fn cache_status(&self) -> (bool, Option<u64>) {
        let catalog = self.catalog.read();
        (
            catalog.needs_refresh(self.config.catalog_ttl),
            catalog.cache_age_secs(),
        )
    }

    pub fn price_path(
        &self,
        graph: &PathGraph,
        path: &PlanPath,
        start_prices: &StartPrices,
    ) -> Result<PathCost, InvalidPathError> {
        let catalog = self.catalog.read();
        PathCostResolver::new(&catalog, self.hangar.as_ref()).resolve(graph, path, start_prices)
    }

    /// Every path leaving `start`, cheapest first.
    pub fn price_paths(
        &self,
        graph: &PathGraph,
        start: &NodeId,
        start_prices: &StartPrices,
    ) -> Vec<PathCost> {
        let catalog = self.catalog.read();
        PathCostResolver::new(&catalog, self.hangar.as_ref()).resolve_all(graph, start, start_prices)
    }

    pub fn save_plan(&self, graph: &PathGraph) -> Result<(), PlannerError> {
        let raw = graph.to_json()?;
        self.store
            .set(&format!("{}{}", PLAN_KEY_PREFIX, graph.id()), &raw)?;
        crate::log_info!(graph.log_context(), "PLAN_SAVED", nodes = graph.node_count(), edges = graph.edges().len());
        Ok(())
    }

    pub fn load_plan(&self, plan_id: &str) -> Result<Option<PathGraph>, PlannerError> {
        match self.store.get(&format!("{}{}", PLAN_KEY_PREFIX, plan_id))? {
            Some(raw) => Ok(Some(PathGraph::from_json(&raw)?)),
            None => Ok(None),
        }
    }
}
