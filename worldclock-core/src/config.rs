use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{Location, TimeFormat};

/// Base URLs of the remote collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// OpenWeather 2.5 API root; `/weather` and `/forecast` are appended.
    pub weather: String,
    /// Nominatim root; `/search` and `/reverse` are appended.
    pub geocoder: String,
    /// timeapi.io root; `/api/timezone/coordinate` is appended.
    pub timezone: String,
    pub country_shapes: String,
    pub flags: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather: "https://api.openweathermap.org/data/2.5".to_string(),
            geocoder: "https://nominatim.openstreetmap.org".to_string(),
            timezone: "https://timeapi.io".to_string(),
            country_shapes: "https://teuteuf-dashboard-assets.pages.dev/data/common/country-shapes"
                .to_string(),
            flags: "https://flagicons.lipis.dev/flags/4x3".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// The weather API key is deliberately not part of this file; it lives in
/// its own plaintext file next to it (see [`Config::key_file_path`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub use_24_hour: bool,

    /// Tracked cities, in display order.
    ///
    /// Example TOML:
    /// [[locations]]
    /// city = "London"
    /// timezone = "Europe/London"
    /// latitude = 51.5073
    /// longitude = -0.1276
    /// country_code = "gb"
    pub locations: Vec<Location>,

    pub endpoints: Endpoints,
    pub http_timeout_secs: u64,
    /// How long transient notices stay on screen.
    pub notice_ttl_secs: u64,
    pub user_agent: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_24_hour: false,
            locations: Vec::new(),
            endpoints: Endpoints::default(),
            http_timeout_secs: 10,
            notice_ttl_secs: 3,
            user_agent: concat!("worldclock/", env!("CARGO_PKG_VERSION")).to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn time_format(&self) -> TimeFormat {
        TimeFormat::from_24_hour(self.use_24_hour)
    }

    pub fn set_time_format(&mut self, format: TimeFormat) {
        self.use_24_hour = format.is_24_hour();
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "worldclock", "worldclock")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the plaintext weather API key.
    pub fn key_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("key.txt"))
    }

    /// Directory downloaded country shapes and flags are written to.
    pub fn cache_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.cache_dir().to_path_buf())
    }
}
