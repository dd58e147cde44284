use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Estimated row height in terminal lines
    pub row_height: u16,

    /// Extra rows rendered past each viewport edge
    pub overscan: usize,

    /// Message shown while the first page is in flight
    pub loading_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Rows fetched per page
    pub page_size: usize,

    /// Distance from the bottom, in rows, that triggers the next page
    pub fetch_threshold: usize,

    /// Fit column widths to content on load instead of declared sizes
    pub auto_fit_columns: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding scans/transcripts/validation files
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            overscan: 4,
            loading_text: "Loading scans…".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            fetch_threshold: 10,
            auto_fit_columns: true,
        }
    }
}

impl Config {
    /// Platform config file, e.g. `~/.config/scanview/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scanview").join("config.toml"))
    }

    /// Load the config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory on this platform"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.row_height, 1);
        assert_eq!(config.behavior.page_size, 100);
        assert!(config.behavior.auto_fit_columns);
        assert!(config.data.directory.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [behavior]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.behavior.page_size, 25);
        // Untouched sections keep their defaults
        assert_eq!(config.behavior.fetch_threshold, 10);
        assert_eq!(config.display.overscan, 4);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.data.directory = Some(PathBuf::from("/tmp/scans"));
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.data.directory, Some(PathBuf::from("/tmp/scans")));
    }
}
