//! In-memory catalog cache.
//!
//! Holds the most recently fetched ships and CCU offers. A load replaces
//! everything; there is no merging with the previous snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::models::{Ccu, ExchangeRates, Ship, ShipId, WbHistoryRecord};
use crate::logging::structured::LogContext;

/// Catalog shared between views.
pub type SharedCatalog = Arc<RwLock<CatalogCache>>;

#[derive(Debug, Default)]
pub struct CatalogCache {
    ships: Vec<Ship>,
    ships_by_id: HashMap<ShipId, usize>,
    ships_by_name: HashMap<String, usize>,
    ccus: Vec<Ccu>,
    ccus_by_pair: HashMap<(ShipId, ShipId), usize>,
    warbond_history: Vec<WbHistoryRecord>,
    exchange_rates: ExchangeRates,
    loaded_at: Option<Instant>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCatalog {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Replace ships and CCU offers wholesale and rebuild the indexes.
    pub fn load(&mut self, mut ships: Vec<Ship>, ccus: Vec<Ccu>) {
        ships.sort_by(|a, b| a.msrp.cmp(&b.msrp).then(a.id.cmp(&b.id)));

        self.ships_by_id = ships.iter().enumerate().map(|(i, s)| (s.id, i)).collect();
        self.ships_by_name = HashMap::new();
        for (i, ship) in ships.iter().enumerate() {
            // First (cheapest) ship wins on duplicate names.
            self.ships_by_name.entry(name_key(&ship.name)).or_insert(i);
        }
        self.ships = ships;

        self.ccus_by_pair = ccus
            .iter()
            .enumerate()
            .map(|(i, c)| ((c.from_ship_id, c.to_ship_id), i))
            .collect();
        self.ccus = ccus;
        self.loaded_at = Some(Instant::now());

        crate::log_info!(
            LogContext::catalog(),
            "CATALOG_LOADED",
            ships = self.ships.len(),
            ccus = self.ccus.len(),
        );
    }

    /// Ships sorted by ascending MSRP.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ccus(&self) -> &[Ccu] {
        &self.ccus
    }

    pub fn get_ship_by_id(&self, id: ShipId) -> Option<&Ship> {
        self.ships_by_id.get(&id).map(|&i| &self.ships[i])
    }

    /// Case-insensitive, whitespace-trimmed name lookup.
    pub fn get_ship_by_name(&self, name: &str) -> Option<&Ship> {
        self.ships_by_name.get(&name_key(name)).map(|&i| &self.ships[i])
    }

    pub fn get_ccu(&self, from: ShipId, to: ShipId) -> Option<&Ccu> {
        self.ccus_by_pair.get(&(from, to)).map(|&i| &self.ccus[i])
    }

    /// Official upgrade price for a pair, if the catalog lists one.
    pub fn official_ccu_price(&self, from: ShipId, to: ShipId) -> Option<i64> {
        self.get_ccu(from, to).map(|c| c.price)
    }

    pub fn set_warbond_history(&mut self, history: Vec<WbHistoryRecord>) {
        self.warbond_history = history;
    }

    pub fn warbond_history(&self) -> &[WbHistoryRecord] {
        &self.warbond_history
    }

    /// Lowest warbond price ever recorded for a pair.
    pub fn warbond_price(&self, from: ShipId, to: ShipId) -> Option<i64> {
        self.warbond_history
            .iter()
            .filter(|r| r.from_ship_id == from && r.to_ship_id == to)
            .map(|r| r.price)
            .min()
    }

    pub fn set_exchange_rates(&mut self, rates: ExchangeRates) {
        self.exchange_rates = rates;
    }

    pub fn exchange_rates(&self) -> &ExchangeRates {
        &self.exchange_rates
    }

    /// Check if the catalog needs a refetch (never loaded or TTL expired).
    pub fn needs_refresh(&self, ttl: Duration) -> bool {
        match self.loaded_at {
            Some(loaded_at) => loaded_at.elapsed() > ttl,
            None => true,
        }
    }

    /// Get cache age in seconds (for logging).
    pub fn cache_age_secs(&self) -> Option<u64> {
        self.loaded_at.map(|t| t.elapsed().as_secs())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
