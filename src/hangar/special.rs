//! Static price overrides for known catalog inconsistencies.

use std::collections::HashMap;

use crate::catalog::models::ShipId;

/// Key of a special price entry.
///
/// Id keys survive ship renames; name keys match the display names exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpgradeKey {
    Ids { from: ShipId, to: ShipId },
    Names { from: String, to: String },
}

impl UpgradeKey {
    pub fn names(from: &str, to: &str) -> Self {
        UpgradeKey::Names {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn ids(from: ShipId, to: ShipId) -> Self {
        UpgradeKey::Ids { from, to }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpecialPriceTable {
    prices: HashMap<UpgradeKey, i64>,
}

impl SpecialPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, key: UpgradeKey, price: i64) -> Option<i64> {
        self.prices.insert(key, price)
    }

    pub fn get(&self, key: &UpgradeKey) -> Option<i64> {
        self.prices.get(key).copied()
    }

    pub fn get_by_names(&self, from: &str, to: &str) -> Option<i64> {
        self.get(&UpgradeKey::names(from, to))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
