//! Runtime configuration read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

use crate::error::ConfigError;

pub const DEFAULT_STORAGE_DIR: &str = "./.ccu-planner";
pub const DEFAULT_API_BASE: &str = "https://api.citizenshub.app";
pub const DEFAULT_CURRENCY_CDN: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";
/// Catalog TTL - 5 minutes
pub const DEFAULT_CATALOG_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Directory backing the file key-value store (hangar snapshot, saved plans).
    pub storage_dir: PathBuf,
    pub log_level: LevelFilter,
    pub catalog_ttl: Duration,
    pub api_base: String,
    pub currency_cdn: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            log_level: LevelFilter::Info,
            catalog_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            api_base: DEFAULT_API_BASE.to_string(),
            currency_cdn: DEFAULT_CURRENCY_CDN.to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("CCU_PLANNER_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup("CCU_PLANNER_LOG_LEVEL") {
            config.log_level = level.parse().map_err(|_| ConfigError::InvalidEnvValue {
                var: "CCU_PLANNER_LOG_LEVEL".to_string(),
                reason: format!("unknown log level {:?}", level),
            })?;
        }

        if let Some(ttl) = lookup("CCU_PLANNER_CATALOG_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|e| ConfigError::InvalidEnvValue {
                var: "CCU_PLANNER_CATALOG_TTL_SECS".to_string(),
                reason: format!("{}", e),
            })?;
            config.catalog_ttl = Duration::from_secs(secs);
        }

        if let Some(base) = lookup("CCU_PLANNER_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(cdn) = lookup("CCU_PLANNER_CURRENCY_CDN") {
            config.currency_cdn = cdn.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    pub fn ships_url(&self) -> String {
        format!("{}/api/ships", self.api_base)
    }

    pub fn ccus_url(&self) -> String {
        format!("{}/api/ccus", self.api_base)
    }

    pub fn warbond_history_url(&self) -> String {
        format!("{}/api/wbs/history", self.api_base)
    }

    pub fn exchange_rates_url(&self) -> String {
        format!("{}/usd.json", self.currency_cdn)
    }
}
