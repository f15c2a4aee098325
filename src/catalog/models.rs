//! Catalog records fetched from the remote API.
//!
//! Field names follow the API's camelCase JSON. All prices are in cents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ShipId = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipMedia {
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Purchasable store SKU for a ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub id: u64,
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub limited_stock: bool,
    #[serde(default)]
    pub unlimited_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    #[serde(default)]
    pub manufacturer: Manufacturer,
    #[serde(default)]
    pub focus: String,
    #[serde(default, rename = "type")]
    pub ship_type: String,
    #[serde(default)]
    pub flyable_status: String,
    /// Base pledge price in cents.
    pub msrp: i64,
    #[serde(default)]
    pub media: ShipMedia,
    #[serde(default)]
    pub skus: Vec<Sku>,
}

impl Ship {
    /// Minimal ship record, mostly for callers that only know id, name and price.
    pub fn new(id: ShipId, name: &str, msrp: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            manufacturer: Manufacturer::default(),
            focus: String::new(),
            ship_type: String::new(),
            flyable_status: String::new(),
            msrp,
            media: ShipMedia::default(),
            skus: Vec::new(),
        }
    }

    /// Cheapest SKU currently on sale, if any.
    pub fn cheapest_available_sku(&self) -> Option<&Sku> {
        self.skus
            .iter()
            .filter(|sku| sku.available)
            .min_by_key(|sku| sku.price)
    }
}

/// Official upgrade offer from one ship to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ccu {
    pub from_ship_id: ShipId,
    pub to_ship_id: ShipId,
    /// Official upgrade price in cents.
    pub price: i64,
    pub available: bool,
}

/// Historical warbond upgrade price observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbHistoryRecord {
    pub from_ship_id: ShipId,
    pub to_ship_id: ShipId,
    pub price: i64,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

/// USD based exchange rates keyed by lowercase currency code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub usd: HashMap<String, f64>,
}

impl ExchangeRates {
    pub fn rate(&self, currency: &str) -> Option<f64> {
        let code = currency.trim().to_lowercase();
        if code == "usd" {
            return Some(self.usd.get("usd").copied().unwrap_or(1.0));
        }
        self.usd.get(&code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ship_deserializes_api_shape() {
        let ship: Ship = serde_json::from_value(json!({
            "id": 12,
            "name": "Aurora LN",
            "manufacturer": {"name": "Roberts Space Industries", "code": "RSI"},
            "focus": "Combat",
            "type": "combat",
            "flyableStatus": "Flyable",
            "msrp": 4500,
            "media": {"storeUrl": "https://example.test/ln.jpg"},
            "skus": [
                {"id": 1, "title": "Standard Edition", "price": 4500, "available": true},
                {"id": 2, "title": "Warbond Edition", "price": 4000, "available": false}
            ]
        }))
        .unwrap();

        assert_eq!(ship.ship_type, "combat");
        assert_eq!(ship.manufacturer.code, "RSI");
        assert_eq!(ship.cheapest_available_sku().map(|s| s.id), Some(1));
    }

    #[test]
    fn test_ship_tolerates_missing_optional_fields() {
        let ship: Ship = serde_json::from_value(json!({"id": 3, "name": "Mustang Alpha", "msrp": 2500})).unwrap();
        assert_eq!(ship, Ship::new(3, "Mustang Alpha", 2500));
        assert!(ship.cheapest_available_sku().is_none());
    }

    #[test]
    fn test_exchange_rate_lookup() {
        let rates = ExchangeRates {
            usd: HashMap::from([("eur".to_string(), 0.9), ("cny".to_string(), 7.1)]),
        };
        assert_eq!(rates.rate("EUR"), Some(0.9));
        assert_eq!(rates.rate("usd"), Some(1.0));
        assert_eq!(rates.rate("gbp"), None);
    }
}
