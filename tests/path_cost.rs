//! End-to-end pricing scenarios for the planner.

use std::sync::Arc;

use anyhow::Result;
use ccu_planner_core::catalog::{CatalogCache, Ccu, Ship};
use ccu_planner_core::graph::{PathGraph, PlanPath, Position, SourceType};
use ccu_planner_core::hangar::{
    HangarItem, HangarPriceLookup, HangarPriceProvider, KeyValueStore, MemoryStore,
    NoHangarPrices, HANGAR_ITEMS_KEY,
};
use ccu_planner_core::pricing::{PathCostResolver, PriceSource, StartPrices};

fn catalog() -> CatalogCache {
    let mut cache = CatalogCache::new();
    cache.load(
        vec![
            Ship::new(1, "Mustang Alpha", 3000),
            Ship::new(2, "Aurora LX", 3500),
            Ship::new(3, "Aurora LN", 4000),
            Ship::new(10, "Zeus Mk II ES", 15000),
            Ship::new(11, "Constellation Taurus", 16500),
        ],
        vec![
            Ccu { from_ship_id: 1, to_ship_id: 2, price: 500, available: true },
            Ccu { from_ship_id: 2, to_ship_id: 3, price: 500, available: true },
            Ccu { from_ship_id: 10, to_ship_id: 11, price: 1500, available: true },
        ],
    );
    cache
}

fn ship(cache: &CatalogCache, id: u64) -> Ship {
    cache.get_ship_by_id(id).cloned().expect("ship in test catalog")
}

#[test]
fn official_edge_resolves_to_catalog_price() -> Result<()> {
    let cache = catalog();
    let mut graph = PathGraph::with_id("plan-official");
    let a = graph.add_node(ship(&cache, 1), Position::default());
    let b = graph.add_node(ship(&cache, 2), Position::default());
    let e = graph.add_edge(&a, &b, SourceType::Official, None)?;

    let resolver = PathCostResolver::new(&cache, &NoHangarPrices);
    let cost = resolver.edge_price(graph.edge(&e).unwrap(), &graph.log_context());
    assert_eq!(cost.price, cache.official_ccu_price(1, 2).unwrap());
    Ok(())
}

#[test]
fn third_party_custom_price_beats_official() -> Result<()> {
    let cache = catalog();
    let mut graph = PathGraph::with_id("plan-third-party");
    let a = graph.add_node(ship(&cache, 1), Position::default());
    let b = graph.add_node(ship(&cache, 2), Position::default());
    let source_type: SourceType = "第三方".parse().map_err(anyhow::Error::msg)?;
    let e = graph.add_edge(&a, &b, source_type, Some(25))?;

    let resolver = PathCostResolver::new(&cache, &NoHangarPrices);
    let cost = resolver.edge_price(graph.edge(&e).unwrap(), &graph.log_context());
    assert_eq!(cost.price, 25);
    assert_eq!(cost.source, PriceSource::Custom);
    Ok(())
}

#[test]
fn hangar_credit_overrides_official_price_in_any_case() -> Result<()> {
    let cache = catalog();
    let provider = HangarPriceProvider::new(Arc::new(MemoryStore::new()));
    provider.set_hangar_items(vec![HangarItem::ccu("ZEUS MK II ES", "CONSTELLATION TAURUS", 10)]);

    let mut graph = PathGraph::with_id("plan-hangar");
    let a = graph.add_node(ship(&cache, 10), Position::default());
    let b = graph.add_node(ship(&cache, 11), Position::default());
    let e = graph.add_edge(&a, &b, SourceType::Official, None)?;
    assert_eq!(graph.edge(&e).unwrap().price, 1500);

    let resolver = PathCostResolver::new(&cache, &provider);
    let cost = resolver.edge_price(graph.edge(&e).unwrap(), &graph.log_context());
    assert_eq!(cost.price, 10);
    assert_eq!(cost.source, PriceSource::Hangar);
    Ok(())
}

#[test]
fn hangar_credit_wins_over_conflicting_custom_price() -> Result<()> {
    let cache = catalog();
    let provider = HangarPriceProvider::new(Arc::new(MemoryStore::new()));
    provider.add_special_price_mapping("Mustang Alpha", "Aurora LX", 5);

    let mut graph = PathGraph::with_id("plan-special");
    let a = graph.add_node(ship(&cache, 1), Position::default());
    let b = graph.add_node(ship(&cache, 2), Position::default());
    let e = graph.add_edge(&a, &b, SourceType::ThirdParty, Some(25))?;

    let resolver = PathCostResolver::new(&cache, &provider);
    let cost = resolver.edge_price(graph.edge(&e).unwrap(), &graph.log_context());
    assert_eq!(cost.price, provider.hangar_ccu_price("Mustang Alpha", "Aurora LX").unwrap());
    Ok(())
}

#[test]
fn mustang_to_aurora_ln_totals_555() -> Result<()> {
    let cache = catalog();
    let mut graph = PathGraph::with_id("plan-555");
    let mustang = graph.add_node(ship(&cache, 1), Position::new(0.0, 0.0));
    let lx = graph.add_node(ship(&cache, 2), Position::new(200.0, 0.0));
    let ln = graph.add_node(ship(&cache, 3), Position::new(400.0, 0.0));
    let first = graph.add_edge(&mustang, &lx, SourceType::ThirdParty, Some(25))?;
    let second = graph.add_edge(&lx, &ln, SourceType::Official, None)?;

    let start_prices = StartPrices::from([(mustang.clone(), 30)]);
    let resolver = PathCostResolver::new(&cache, &NoHangarPrices);
    let cost = resolver.resolve(&graph, &PlanPath::new(mustang, vec![first, second]), &start_prices)?;

    assert_eq!(cost.start_price, 30);
    assert_eq!(cost.edge_prices(), vec![25, 500]);
    assert_eq!(cost.total, 555);
    assert!(cost.is_complete());
    Ok(())
}

#[test]
fn persisted_hangar_survives_a_new_provider() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    HangarPriceProvider::new(store.clone())
        .set_hangar_items(vec![HangarItem::ccu("Aurora LX", "Aurora LN", 300)]);

    let raw = store.get(HANGAR_ITEMS_KEY)?;
    assert!(raw.unwrap().contains("\"fromShip\":\"Aurora LX\""));

    let provider = HangarPriceProvider::new(store);
    assert_eq!(provider.get_hangar_ccu_price("aurora lx", "AURORA LN"), Some(300));
    Ok(())
}

#[test]
fn unknown_ship_id_is_not_found() {
    let cache = catalog();
    assert!(cache.get_ship_by_id(404).is_none());
    assert!(CatalogCache::new().get_ship_by_id(1).is_none());
}
