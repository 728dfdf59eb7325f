//! Configuration management for dockcrew
//!
//! Config stored at: ~/.config/dockcrew/config.json

use dockcrew_types::{ConfigError, DockRange, OutputFormat, Result, TenantId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lowest valid dock number
    #[serde(default = "default_dock_min")]
    pub dock_min: u32,

    /// Highest valid dock number
    #[serde(default = "default_dock_max")]
    pub dock_max: u32,

    /// Store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Tenant used when none is given on the command line
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_dock_min() -> u32 {
    DockRange::DEFAULT_MIN
}

fn default_dock_max() -> u32 {
    DockRange::DEFAULT_MAX
}

fn default_tenant() -> String {
    "default".to_string()
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dock_min: default_dock_min(),
            dock_max: default_dock_max(),
            store_dir: None,
            tenant: default_tenant(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("dockcrew");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("dockcrew");
        Ok(store_dir)
    }

    /// Valid dock numbers
    pub fn dock_range(&self) -> Result<DockRange> {
        Ok(DockRange::new(self.dock_min, self.dock_max)?)
    }

    /// Default tenant
    pub fn tenant_id(&self) -> Result<TenantId> {
        TenantId::new(self.tenant.as_str())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific file, or default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.dock_range()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.dock_range()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dockcrew Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Docks:          {}-{}", self.dock_min, self.dock_max)?;
        writeln!(f, "Tenant:         {}", self.tenant)?;
        writeln!(
            f,
            "Store dir:      {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockcrew_types::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dock_range().unwrap(), DockRange::default());
        assert_eq!(config.tenant_id().unwrap().as_str(), "default");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            dock_min: 1,
            dock_max: 8,
            store_dir: Some(dir.path().join("store")),
            tenant: "north-yard".to_string(),
            output_format: OutputFormat::Json,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(
            Config::load_from(&dir.path().join("absent.json")).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_inverted_dock_range_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"dock_min": 9, "dock_max": 3}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unparseable_config_is_config_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "dock_min = 2").unwrap();

        assert_eq!(Config::load_from(&path).unwrap_err().kind(), ErrorKind::Config);
    }
}
