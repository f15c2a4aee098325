//! Joined catalog load.
//!
//! The four catalog resources are fetched in parallel and decoded before the
//! cache is touched. A failure in any one of them fails the whole load and
//! leaves the cache as it was.

use std::thread;

use super::cache::CatalogCache;
use super::payload::{decode_ccus, decode_exchange_rates, decode_ships, decode_warbond_history};
use crate::error::{CatalogError, FetchError};
use crate::logging::structured::LogContext;

/// Raw access to the remote catalog. Implementations perform the HTTP
/// requests and return the response body.
pub trait CatalogSource: Sync {
    fn fetch_ships(&self) -> Result<String, FetchError>;
    fn fetch_ccus(&self) -> Result<String, FetchError>;
    fn fetch_warbond_history(&self) -> Result<String, FetchError>;
    fn fetch_exchange_rates(&self) -> Result<String, FetchError>;
}

/// Counts of what a successful load installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub ships: usize,
    pub ccus: usize,
    pub warbond_records: usize,
    pub currencies: usize,
}

fn fetch_all<S: CatalogSource + ?Sized>(
    source: &S,
) -> [Result<String, FetchError>; 4] {
    thread::scope(|scope| {
        let ships = scope.spawn(|| source.fetch_ships());
        let ccus = scope.spawn(|| source.fetch_ccus());
        let history = scope.spawn(|| source.fetch_warbond_history());
        let rates = scope.spawn(|| source.fetch_exchange_rates());

        [ships, ccus, history, rates].map(|handle| {
            handle
                .join()
                .unwrap_or_else(|_| Err(FetchError::new("catalog", "fetch thread panicked")))
        })
    })
}

/// Fetch, decode and install the catalog.
pub fn load_catalog<S: CatalogSource + ?Sized>(
    source: &S,
    cache: &mut CatalogCache,
) -> Result<LoadSummary, CatalogError> {
    let (ships, ccus, history, rates) = match fetch_all(source) {
        [Ok(ships), Ok(ccus), Ok(history), Ok(rates)] => (ships, ccus, history, rates),
        results => {
            let ctx = LogContext::catalog();
            let failed: Vec<String> = results
                .into_iter()
                .filter_map(Result::err)
                .map(|e| {
                    crate::log_warn!(ctx, "CATALOG_FETCH_FAILED", resource = e.resource, reason = e.reason);
                    e.resource
                })
                .collect();

            crate::log_warn!(
                ctx,
                "CATALOG_UNAVAILABLE",
                failed = failed,
                kept_previous = cache.is_loaded(),
            );
            return Err(CatalogError::Unavailable { failed });
        }
    };

    let ships = decode_ships(&ships)?;
    let ccus = decode_ccus(&ccus)?;
    let history = decode_warbond_history(&history)?;
    let rates = decode_exchange_rates(&rates)?;

    let summary = LoadSummary {
        ships: ships.len(),
        ccus: ccus.len(),
        warbond_records: history.len(),
        currencies: rates.usd.len(),
    };

    cache.load(ships, ccus);
    cache.set_warbond_history(history);
    cache.set_exchange_rates(rates);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::Ship;
    use serde_json::json;

    struct FixedSource {
        fail: Vec<&'static str>,
    }

    impl FixedSource {
        fn respond(&self, resource: &str, body: serde_json::Value) -> Result<String, FetchError> {
            if self.fail.iter().any(|f| *f == resource) {
                Err(FetchError::new(resource, "HTTP 503"))
            } else {
                Ok(body.to_string())
            }
        }
    }

    impl CatalogSource for FixedSource {
        fn fetch_ships(&self) -> Result<String, FetchError> {
            self.respond("ships", json!({"data": {"ships": [
                {"id": 1, "name": "Mustang Alpha", "msrp": 3000},
                {"id": 2, "name": "Aurora LX", "msrp": 3500}
            ]}}))
        }

        fn fetch_ccus(&self) -> Result<String, FetchError> {
            self.respond("ccus", json!({"data": {"to": {"ships": [
                {"id": 2, "skus": [{"price": 500, "upgradeFrom": {"id": 1}}]}
            ]}}}))
        }

        fn fetch_warbond_history(&self) -> Result<String, FetchError> {
            self.respond("warbond_history", json!({"data": []}))
        }

        fn fetch_exchange_rates(&self) -> Result<String, FetchError> {
            self.respond("exchange_rates", json!({"usd": {"eur": 0.9}}))
        }
    }

    #[test]
    fn test_load_catalog_installs_everything() {
        let mut cache = CatalogCache::new();
        let summary = load_catalog(&FixedSource { fail: vec![] }, &mut cache).unwrap();

        assert_eq!(
            summary,
            LoadSummary { ships: 2, ccus: 1, warbond_records: 0, currencies: 1 }
        );
        assert_eq!(cache.official_ccu_price(1, 2), Some(500));
        assert_eq!(cache.exchange_rates().rate("eur"), Some(0.9));
    }

    #[test]
    fn test_any_failure_keeps_previous_catalog() {
        let mut cache = CatalogCache::new();
        cache.load(vec![Ship::new(7, "Cutlass Black", 11000)], vec![]);

        let err = load_catalog(
            &FixedSource { fail: vec!["ccus", "exchange_rates"] },
            &mut cache,
        )
        .unwrap_err();

        match err {
            CatalogError::Unavailable { failed } => {
                assert_eq!(failed, vec!["ccus".to_string(), "exchange_rates".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(cache.get_ship_by_id(7).is_some());
        assert!(cache.get_ship_by_id(1).is_none());
    }
}
