//! Application configuration management.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Player configuration
    #[serde(default)]
    pub player: PlayerConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Catalog search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query issued on startup
    #[serde(default = "default_query")]
    pub default_query: String,

    /// Maximum number of results to request
    #[serde(default = "default_limit")]
    pub result_limit: u32,
}

/// Player configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Volume level (0-100)
    #[serde(default = "default_volume")]
    pub volume: u8,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show album artwork (requires sixel/kitty support)
    #[serde(default = "default_true")]
    pub show_artwork: bool,

    /// Show the waveform/equalizer panel
    #[serde(default = "default_true")]
    pub show_visualizer: bool,

    /// Fixed seed for the visualizer's random jitter; unset means
    /// time-derived
    #[serde(default)]
    pub visualizer_seed: Option<u64>,
}

fn default_query() -> String {
    String::from("eminem")
}

fn default_limit() -> u32 {
    10
}

fn default_volume() -> u8 {
    70
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            result_limit: default_limit(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_artwork: true,
            show_visualizer: true,
            visualizer_seed: None,
        }
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;

        Ok(config_dir.join("tunedeck").join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        // Clamp to valid ranges
        config.player.volume = config.player.volume.min(100);
        config.search.result_limit = config.search.result_limit.clamp(1, 50);

        Ok(config)
    }

    /// Save configuration to file.
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.search.default_query, "eminem");
        assert_eq!(config.search.result_limit, 10);
        assert_eq!(config.player.volume, 70);
        assert!(config.ui.show_artwork);
        assert!(config.ui.show_visualizer);
        assert!(config.ui.visualizer_seed.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [player]
            volume = 35
            "#,
        )
        .unwrap();
        assert_eq!(config.player.volume, 35);
        assert_eq!(config.search.default_query, "eminem");
        assert_eq!(config.search.result_limit, 10);
    }

    #[test]
    fn empty_toml_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.player.volume, 70);
    }
}
