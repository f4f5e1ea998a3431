//! Configuration for the navigation-history engine.
//!
//! Settings can be loaded from a TOML file and fall back to sensible
//! defaults when the file is absent or unreadable.
//!
//! # Example
//!
//! ```
//! use scorenav::config::NavConfig;
//!
//! let config = NavConfig::default();
//! assert_eq!(config.measure_threshold, 1);
//! assert_eq!(config.max_records, 40);
//!
//! let loose = NavConfig {
//!     measure_threshold: 4,
//!     ..NavConfig::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Settings for collation, history bounds, and persistence behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavConfig {
    /// Measure distance within which two positions collate into one stop.
    #[serde(default = "default_measure_threshold")]
    pub measure_threshold: u32,

    /// Staff distance within which two positions collate into one stop.
    #[serde(default = "default_staff_threshold")]
    pub staff_threshold: u32,

    /// Maximum records per stack; the oldest entry is evicted beyond this.
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Silently drop null entries found in persisted stacks on load.
    /// When off, such entries are still dropped but reported as malformed.
    #[serde(default)]
    pub repair_on_load: bool,

    /// Start in observer mode: never write persisted state.
    #[serde(default)]
    pub read_only: bool,
}

/// Returns the default measure collation threshold.
fn default_measure_threshold() -> u32 {
    1
}

/// Returns the default staff collation threshold.
fn default_staff_threshold() -> u32 {
    1
}

/// Returns the default per-stack record bound.
fn default_max_records() -> usize {
    40
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            measure_threshold: default_measure_threshold(),
            staff_threshold: default_staff_threshold(),
            max_records: default_max_records(),
            repair_on_load: false,
            read_only: false,
        }
    }
}

impl NavConfig {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/scorenav/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("scorenav");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't
    /// be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)?;

        Ok(())
    }
}
