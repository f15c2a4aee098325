//! Hangar price provider.
//!
//! Resolves the price of an upgrade the user already owns. Lookup order:
//! 1. special price table (exact names, or ship ids when known)
//! 2. hangar CCU items (names trimmed, case-insensitive, first match wins)
//! 3. nothing, the caller falls back to custom or catalog prices
//!
//! The provider is constructed explicitly and shared by reference or `Arc`.
//! Persistence failures are logged and never reach the caller.

use std::sync::Arc;

use parking_lot::RwLock;

use super::models::HangarItem;
use super::special::{SpecialPriceTable, UpgradeKey};
use super::store::{KeyValueStore, HANGAR_ITEMS_KEY};
use super::title::item_from_title;
use crate::catalog::models::{Ship, ShipId};
use crate::error::StorageError;
use crate::logging::structured::LogContext;

/// Owned-upgrade price lookup consumed by the path cost resolver.
pub trait HangarPriceLookup {
    fn hangar_ccu_price(&self, from_ship: &str, to_ship: &str) -> Option<i64>;

    fn ccu_price_for_ships(&self, from: &Ship, to: &Ship) -> Option<i64> {
        self.hangar_ccu_price(&from.name, &to.name)
    }
}

/// Lookup that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHangarPrices;

impl HangarPriceLookup for NoHangarPrices {
    fn hangar_ccu_price(&self, _from_ship: &str, _to_ship: &str) -> Option<i64> {
        None
    }
}

#[derive(Debug, Default)]
struct ProviderState {
    items: Vec<HangarItem>,
    special: SpecialPriceTable,
}

pub struct HangarPriceProvider {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<ProviderState>,
}

impl std::fmt::Debug for HangarPriceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("HangarPriceProvider")
            .field("items", &state.items.len())
            .field("special", &state.special.len())
            .finish()
    }
}

/// Decode the persisted list item by item; unreadable items are skipped.
fn read_snapshot(store: &dyn KeyValueStore) -> Result<Vec<HangarItem>, StorageError> {
    let raw = match store.get(HANGAR_ITEMS_KEY)? {
        Some(raw) => raw,
        None => return Ok(Vec::new()),
    };
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|source| StorageError::Serialize {
            key: HANGAR_ITEMS_KEY.to_string(),
            source,
        })?;

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<HangarItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                crate::log_warn!(LogContext::hangar(), "HANGAR_ITEM_SKIPPED", index = index, error = e.to_string());
                None
            }
        })
        .collect())
}

fn write_snapshot(store: &dyn KeyValueStore, items: &[HangarItem]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items).map_err(|source| StorageError::Serialize {
        key: HANGAR_ITEMS_KEY.to_string(),
        source,
    })?;
    store.set(HANGAR_ITEMS_KEY, &raw)
}

impl HangarPriceProvider {
    /// Create the provider and eagerly load the persisted snapshot.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match read_snapshot(store.as_ref()) {
            Ok(items) => {
                crate::log_info!(LogContext::hangar(), "HANGAR_ITEMS_LOADED", count = items.len());
                items
            }
            Err(e) => {
                crate::log_warn!(LogContext::hangar(), "HANGAR_LOAD_FAILED", error = e.to_string(), fallback = "empty");
                Vec::new()
            }
        };

        Self {
            store,
            state: RwLock::new(ProviderState {
                items,
                special: SpecialPriceTable::new(),
            }),
        }
    }

    /// Replace the whole item list and persist it.
    ///
    /// The in-memory list is replaced even when the write fails.
    pub fn set_hangar_items(&self, items: Vec<HangarItem>) {
        let mut state = self.state.write();
        self.replace_items(&mut state, items);
    }

    fn replace_items(&self, state: &mut ProviderState, items: Vec<HangarItem>) {
        if let Err(e) = write_snapshot(self.store.as_ref(), &items) {
            crate::log_warn!(LogContext::hangar(), "HANGAR_PERSIST_FAILED", error = e.to_string(), count = items.len());
        } else {
            crate::log_debug!(LogContext::hangar(), "HANGAR_PERSISTED", count = items.len());
        }

        state.items = items;
    }

    pub fn get_hangar_items(&self) -> Vec<HangarItem> {
        self.state.read().items.clone()
    }

    pub fn items_for_owner(&self, owner: &str) -> Vec<HangarItem> {
        self.state
            .read()
            .items
            .iter()
            .filter(|item| item.belongs_to(owner))
            .cloned()
            .collect()
    }

    /// Parse pledge titles and replace the items owned by `owner` with them.
    ///
    /// Returns how many titles were recognized as upgrades.
    pub fn import_titles(&self, owner: &str, titles: &[(String, i64)]) -> usize {
        let imported: Vec<HangarItem> = titles
            .iter()
            .filter_map(|(title, price)| item_from_title(title, *price, Some(owner)))
            .collect();
        let count = imported.len();

        let mut state = self.state.write();
        let mut items: Vec<HangarItem> = state
            .items
            .iter()
            .filter(|item| !item.belongs_to(owner))
            .cloned()
            .collect();
        items.extend(imported);
        self.replace_items(&mut state, items);
        drop(state);

        crate::log_info!(
            LogContext::hangar(),
            "HANGAR_IMPORTED",
            owner = owner,
            titles = titles.len(),
            upgrades = count,
        );
        count
    }

    pub fn get_hangar_ccu_price(&self, from_ship: &str, to_ship: &str) -> Option<i64> {
        let state = self.state.read();

        if let Some(price) = state.special.get_by_names(from_ship, to_ship) {
            crate::log_debug!(
                LogContext::hangar(),
                "HANGAR_PRICE_SPECIAL",
                from = from_ship,
                to = to_ship,
                price = price,
            );
            return Some(price);
        }

        state
            .items
            .iter()
            .find(|item| item.is_ccu() && item.matches(from_ship, to_ship))
            .map(|item| item.price)
    }

    /// Hangar pages holding the credit for a pair, for redemption.
    pub fn redemption_pages(&self, from_ship: &str, to_ship: &str) -> Vec<String> {
        self.state
            .read()
            .items
            .iter()
            .filter(|item| item.is_ccu() && item.matches(from_ship, to_ship))
            .flat_map(|item| item.page_ids.iter().cloned())
            .collect()
    }

    /// Insert or overwrite a special price for a pair of ship names (session only).
    pub fn add_special_price_mapping(&self, from_ship: &str, to_ship: &str, price: i64) {
        self.state
            .write()
            .special
            .insert(UpgradeKey::names(from_ship, to_ship), price);
    }

    /// Insert or overwrite a special price for a pair of ship ids (session only).
    pub fn add_special_price_mapping_by_id(&self, from: ShipId, to: ShipId, price: i64) {
        self.state
            .write()
            .special
            .insert(UpgradeKey::ids(from, to), price);
    }
}

impl HangarPriceLookup for HangarPriceProvider {
    fn hangar_ccu_price(&self, from_ship: &str, to_ship: &str) -> Option<i64> {
        self.get_hangar_ccu_price(from_ship, to_ship)
    }

    fn ccu_price_for_ships(&self, from: &Ship, to: &Ship) -> Option<i64> {
        let by_id = self
            .state
            .read()
            .special
            .get(&UpgradeKey::ids(from.id, to.id));
        by_id.or_else(|| self.get_hangar_ccu_price(&from.name, &to.name))
    }
}
