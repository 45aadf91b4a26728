use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::LedgerError,
};

const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences stored next to the ledger as `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub backup_retention: usize,
    pub color_enabled: bool,
    /// Group selected when the shell last exited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_group: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            color_enabled: true,
            last_group: None,
        }
    }
}

impl Config {
    /// `amount` with two decimals, prefixed by the currency symbol.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Stored configuration, or defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            currency_symbol: "$".into(),
            backup_retention: 2,
            color_enabled: false,
            last_group: Some("Trip".into()),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "currency_symbol": "€" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.backup_retention, DEFAULT_BACKUP_RETENTION);
        assert_eq!(config.format_amount(12.5), "€12.50");
    }
}
