//! Configuration loaded from `<config_home>/daytrade-tax/config.toml`
//!
//! ```toml
//! [costs]
//! default_brokerage_fee = "1.00"
//! default_exchange_fee_pct = "0"
//! default_taxes_pct = "9.65"
//! ```
//!
//! A missing file means built-in defaults (all costs zero).

use anyhow::{anyhow, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TaxError};
use crate::tax::TaxCostsConfig;

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub costs: TaxCostsConfig,
}

impl AppConfig {
    /// Load from an explicit path, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), TaxError> {
        let checks = [
            ("default_brokerage_fee", self.costs.default_brokerage_fee),
            ("default_exchange_fee_pct", self.costs.default_exchange_fee_pct),
            ("default_taxes_pct", self.costs.default_taxes_pct),
        ];

        for (name, value) in checks {
            if value < Decimal::ZERO {
                return Err(TaxError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let config_dir =
        dir_spec::config_home().ok_or_else(|| anyhow!("Could not determine config directory"))?;

    Ok(config_dir.join("daytrade-tax").join(CONFIG_FILENAME))
}
