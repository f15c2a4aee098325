//! CCU Planner Core - upgrade path and price resolution
//!
//! This crate is the computation layer behind the CCU planner canvas. A user
//! places ships on a canvas, connects them with upgrade ("CCU") edges, and the
//! crate works out what a chain of upgrades costs, reusing upgrade credits
//! the user already owns.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `catalog` - Ship/CCU models, payload decoding, joined load, id-indexed cache
//! - `hangar` - Owned upgrade credits, persistence, the hangar price provider
//! - `graph` - Plan nodes and edges, derived edge views, path enumeration
//! - `pricing` - Path cost resolution and currency display
//! - `planner` - Session wiring of the above from one config
//! - `config` - Environment driven configuration
//! - `logging` - Structured logging with plan context
//! - `error` - Error taxonomy
//!
//! HTTP is not performed here: callers implement [`catalog::CatalogSource`]
//! and hand the response bodies to the crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod hangar;
pub mod logging;
pub mod planner;
pub mod pricing;

pub use catalog::{CatalogCache, CatalogSource, Ccu, Ship, ShipId, SharedCatalog};
pub use config::PlannerConfig;
pub use error::{CatalogError, InvalidEdgeError, InvalidPathError, PlannerError, StorageError};
pub use graph::{EdgeId, NodeId, PathEdge, PathGraph, PathNode, PlanPath, Position, SourceType};
pub use hangar::{HangarItem, HangarPriceLookup, HangarPriceProvider, KeyValueStore};
pub use logging::init_logger;
pub use planner::Planner;
pub use pricing::{PathCost, PathCostResolver, PriceSource, PriceWarning, StartPrices};
