//! Decoding of the remote API envelopes.
//!
//! The API wraps every list in a `data` object; the helpers here walk to the
//! list with a dot path and hand it to serde.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::models::{Ccu, ExchangeRates, Ship, ShipId, WbHistoryRecord};
use crate::error::CatalogError;

/// Resolve a dot-notation path to a value in JSON.
pub(crate) fn resolve_json_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }

    let mut current = data;
    for part in path.split('.') {
        match current {
            Value::Object(obj) => {
                current = obj.get(part)?;
            }
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

fn decode_at<T: DeserializeOwned>(
    body: &str,
    path: &str,
    resource: &'static str,
) -> Result<T, CatalogError> {
    let root: Value =
        serde_json::from_str(body).map_err(|source| CatalogError::Decode { resource, source })?;

    // A missing list decodes as JSON null so serde reports which field is absent.
    let value = resolve_json_path(&root, path).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| CatalogError::Decode { resource, source })
}

/// `GET /api/ships -> { data: { ships: Ship[] } }`
pub fn decode_ships(body: &str) -> Result<Vec<Ship>, CatalogError> {
    decode_at(body, "data.ships", "ships")
}

#[derive(Debug, Deserialize)]
struct UpgradeSource {
    id: ShipId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpgradeSku {
    price: i64,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    upgrade_from: Option<UpgradeSource>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct UpgradeTarget {
    id: ShipId,
    #[serde(default)]
    skus: Vec<UpgradeSku>,
}

/// `GET /api/ccus -> { data: { to: { ships: [...] } } }`
///
/// Every target ship lists the upgrade SKUs leading to it; each SKU names
/// its source ship in `upgradeFrom`. The result is flattened to one
/// [`Ccu`] per SKU; SKUs without a source ship are skipped.
pub fn decode_ccus(body: &str) -> Result<Vec<Ccu>, CatalogError> {
    let targets: Vec<UpgradeTarget> = decode_at(body, "data.to.ships", "ccus")?;

    Ok(targets
        .into_iter()
        .flat_map(|target| {
            let to_ship_id = target.id;
            target.skus.into_iter().filter_map(move |sku| {
                Some(Ccu {
                    from_ship_id: sku.upgrade_from?.id,
                    to_ship_id,
                    price: sku.price,
                    available: sku.available,
                })
            })
        })
        .collect())
}

/// `GET /api/wbs/history -> { data: WbHistoryRecord[] }`
pub fn decode_warbond_history(body: &str) -> Result<Vec<WbHistoryRecord>, CatalogError> {
    decode_at(body, "data", "warbond_history")
}

/// `GET <currency-cdn>/usd.json -> { usd: { <code>: rate } }`
pub fn decode_exchange_rates(body: &str) -> Result<ExchangeRates, CatalogError> {
    let mut rates: ExchangeRates = decode_at(body, "", "exchange_rates")?;
    rates.usd = rates
        .usd
        .into_iter()
        .map(|(code, rate)| (code.to_lowercase(), rate))
        .collect();
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_json_path() {
        let data = json!({"data": {"items": [{"name": "first"}, {"name": "second"}]}});
        assert_eq!(resolve_json_path(&data, "data.items.1.name"), Some(&json!("second")));
        assert_eq!(resolve_json_path(&data, "data.missing"), None);
        assert_eq!(resolve_json_path(&data, ""), Some(&data));
    }

    #[test]
    fn test_decode_ships() {
        let body = json!({"data": {"ships": [
            {"id": 1, "name": "Mustang Alpha", "msrp": 3000},
            {"id": 2, "name": "Aurora LX", "msrp": 3500}
        ]}})
        .to_string();

        let ships = decode_ships(&body).unwrap();
        assert_eq!(ships.len(), 2);
        assert_eq!(ships[1].name, "Aurora LX");
    }

    #[test]
    fn test_decode_ccus_flattens_targets() {
        let body = json!({"data": {"to": {"ships": [
            {"id": 2, "name": "Aurora LX", "skus": [
                {"price": 500, "upgradeFrom": {"id": 1}},
                {"price": 300, "available": false, "upgradeFrom": {"id": 5}}
            ]},
            {"id": 3, "name": "Aurora LN", "skus": [
                {"price": 1000, "upgradeFrom": {"id": 2}},
                {"price": 4000}
            ]}
        ]}}})
        .to_string();

        let ccus = decode_ccus(&body).unwrap();
        assert_eq!(
            ccus,
            vec![
                Ccu { from_ship_id: 1, to_ship_id: 2, price: 500, available: true },
                Ccu { from_ship_id: 5, to_ship_id: 2, price: 300, available: false },
                Ccu { from_ship_id: 2, to_ship_id: 3, price: 1000, available: true },
            ]
        );
    }

    #[test]
    fn test_decode_warbond_history() {
        let body = json!({"data": [
            {"fromShipId": 1, "toShipId": 2, "price": 400, "observedAt": "2024-11-20T00:00:00Z"}
        ]})
        .to_string();

        let history = decode_warbond_history(&body).unwrap();
        assert_eq!(history[0].price, 400);
        assert!(history[0].observed_at.is_some());
    }

    #[test]
    fn test_decode_exchange_rates_lowercases_codes() {
        let rates = decode_exchange_rates(r#"{"date": "2026-10-01", "usd": {"EUR": 0.92, "cny": 7.1}}"#).unwrap();
        assert_eq!(rates.rate("eur"), Some(0.92));
    }

    #[test]
    fn test_decode_errors_name_the_resource() {
        let err = decode_ships(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Decode { resource: "ships", .. }));

        let err = decode_ccus("not json").unwrap_err();
        assert!(matches!(err, CatalogError::Decode { resource: "ccus", .. }));
    }
}
