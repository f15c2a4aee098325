//! Path cost resolution.
//!
//! Prices one walk through a plan:
//! 1. Seed with the declared start price, else the start ship's MSRP
//!    (the catalog's, or the copy embedded in the node when the catalog lacks it)
//! 2. Price every edge (hangar > custom > warbond history > official, see
//!    [`PathCostResolver::edge_price`])
//! 3. Sum with saturation, keeping the per-edge breakdown for display
//!
//! Data problems never fail a resolution. An edge whose ships are not in
//! the catalog is priced at zero and flagged, so a total can always be shown.

use std::collections::HashMap;

use crate::catalog::cache::CatalogCache;
use crate::catalog::models::ShipId;
use crate::error::InvalidPathError;
use crate::graph::model::{EdgeId, NodeId, PathEdge, SourceType};
use crate::graph::plan::{PathGraph, PlanPath};
use crate::hangar::provider::HangarPriceLookup;
use crate::logging::structured::LogContext;

/// Declared purchase prices of start ships, keyed by node.
pub type StartPrices = HashMap<NodeId, i64>;

/// Which rule produced an edge's effective price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Hangar,
    Custom,
    WarbondHistory,
    Official,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceWarning {
    /// Ship id not present in the catalog; priced at zero.
    UnresolvedShip { edge: Option<EdgeId>, ship_id: ShipId },
    /// Warbond or third-party edge without a recorded price.
    MissingCustomPrice { edge: EdgeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeCost {
    pub edge_id: EdgeId,
    pub source_type: SourceType,
    pub price: i64,
    pub source: PriceSource,
    pub warning: Option<PriceWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCost {
    pub path: PlanPath,
    pub start_price: i64,
    pub edges: Vec<EdgeCost>,
    pub total: i64,
    pub warnings: Vec<PriceWarning>,
}

impl PathCost {
    pub fn edge_prices(&self) -> Vec<i64> {
        self.edges.iter().map(|e| e.price).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub struct PathCostResolver<'a> {
    catalog: &'a CatalogCache,
    hangar: &'a dyn HangarPriceLookup,
}

impl<'a> PathCostResolver<'a> {
    pub fn new(catalog: &'a CatalogCache, hangar: &'a dyn HangarPriceLookup) -> Self {
        Self { catalog, hangar }
    }

    /// Effective price of a single edge.
    ///
    /// # Precedence
    /// 1. Either ship missing from the catalog -> 0 with a warning
    /// 2. Owned upgrade (hangar or special price) -> that price
    /// 3. Custom price set, whatever the source type -> custom price
    /// 4. Warbond edge without custom price -> lowest recorded warbond price
    /// 5. Official catalog price for the pair, else the MSRP delta stored on
    ///    the edge when it was drawn
    ///
    /// Non-official edges that reach step 5 are flagged as missing a price.
    pub fn edge_price(&self, edge: &PathEdge, ctx: &LogContext) -> EdgeCost {
        let ctx = ctx.with_edge(edge.id.as_str());
        let cost = |price: i64, source: PriceSource, warning: Option<PriceWarning>| EdgeCost {
            edge_id: edge.id.clone(),
            source_type: edge.source_type,
            price,
            source,
            warning,
        };

        let from = self.catalog.get_ship_by_id(edge.source_ship.id);
        let to = self.catalog.get_ship_by_id(edge.target_ship.id);
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            (from, _) => {
                let ship_id = if from.is_none() {
                    edge.source_ship.id
                } else {
                    edge.target_ship.id
                };
                crate::log_warn!(ctx, "EDGE_SHIP_UNRESOLVED", ship_id = ship_id, price = 0);
                return cost(
                    0,
                    PriceSource::Unresolved,
                    Some(PriceWarning::UnresolvedShip {
                        edge: Some(edge.id.clone()),
                        ship_id,
                    }),
                );
            }
        };

        if let Some(price) = self.hangar.ccu_price_for_ships(from, to) {
            crate::log_debug!(ctx, "EDGE_PRICE_HANGAR", price = price, custom = edge.custom_price);
            return cost(price, PriceSource::Hangar, None);
        }

        if let Some(custom) = edge.custom_price {
            return cost(custom, PriceSource::Custom, None);
        }

        if edge.source_type == SourceType::OfficialWarbond {
            if let Some(price) = self.catalog.warbond_price(from.id, to.id) {
                return cost(price, PriceSource::WarbondHistory, None);
            }
        }

        let official = self
            .catalog
            .official_ccu_price(from.id, to.id)
            .unwrap_or(edge.price);

        if edge.source_type.uses_custom_price() {
            crate::log_warn!(
                ctx,
                "EDGE_CUSTOM_PRICE_MISSING",
                source_type = edge.source_type.as_str(),
                fallback = official,
            );
            return cost(
                official,
                PriceSource::Official,
                Some(PriceWarning::MissingCustomPrice {
                    edge: edge.id.clone(),
                }),
            );
        }

        cost(official, PriceSource::Official, None)
    }

    /// Price one path through the plan.
    pub fn resolve(
        &self,
        graph: &PathGraph,
        path: &PlanPath,
        start_prices: &StartPrices,
    ) -> Result<PathCost, InvalidPathError> {
        let ctx = graph.log_context();
        let start = graph
            .node(&path.start)
            .ok_or_else(|| InvalidPathError::UnknownNode(path.start.clone()))?;

        let mut warnings = Vec::new();
        let start_price = match start_prices.get(&start.id) {
            Some(&declared) => declared,
            None => match self.catalog.get_ship_by_id(start.ship.id) {
                Some(ship) => ship.msrp,
                None => {
                    crate::log_warn!(
                        ctx,
                        "START_SHIP_UNRESOLVED",
                        node = start.id.as_str(),
                        price = start.ship.msrp,
                    );
                    warnings.push(PriceWarning::UnresolvedShip {
                        edge: None,
                        ship_id: start.ship.id,
                    });
                    start.ship.msrp
                }
            },
        };

        let mut at = &start.id;
        let mut edges = Vec::with_capacity(path.edges.len());
        for edge_id in &path.edges {
            let edge = graph
                .edge(edge_id)
                .ok_or_else(|| InvalidPathError::UnknownEdge(edge_id.clone()))?;
            if &edge.source != at {
                return Err(InvalidPathError::Disconnected {
                    edge: edge_id.clone(),
                    expected: at.clone(),
                    found: edge.source.clone(),
                });
            }

            let cost = self.edge_price(edge, &ctx);
            if let Some(warning) = &cost.warning {
                warnings.push(warning.clone());
            }
            edges.push(cost);
            at = &edge.target;
        }

        let total = edges
            .iter()
            .fold(start_price, |total, e| total.saturating_add(e.price));

        crate::log_debug!(
            ctx,
            "PATH_RESOLVED",
            start = path.start.as_str(),
            edges = edges.len(),
            total = total,
            warnings = warnings.len(),
        );

        Ok(PathCost {
            path: path.clone(),
            start_price,
            edges,
            total,
            warnings,
        })
    }

    /// Price every path leaving `start`, cheapest first.
    pub fn resolve_all(
        &self,
        graph: &PathGraph,
        start: &NodeId,
        start_prices: &StartPrices,
    ) -> Vec<PathCost> {
        // Paths stop where a cycle would revisit a node.
        if graph.find_cycle().is_some() {
            crate::log_warn!(graph.log_context(), "PATHS_TRUNCATED_AT_CYCLE", start = start.as_str());
        }

        let mut costs: Vec<PathCost> = graph
            .enumerate_paths(start)
            .iter()
            .filter_map(|path| self.resolve(graph, path, start_prices).ok())
            .collect();

        costs.sort_by(|a, b| {
            a.total
                .cmp(&b.total)
                .then(a.edges.len().cmp(&b.edges.len()))
        });

        crate::log_info!(
            graph.log_context(),
            "PATHS_RESOLVED",
            start = start.as_str(),
            paths = costs.len(),
            cheapest = costs.first().map(|c| c.total),
        );
        costs
    }
}
