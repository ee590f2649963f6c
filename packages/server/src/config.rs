//! Server configuration.
//!
//! Deployment settings (bind address, port, input file paths) come from
//! environment variables. Presentation settings come from a TOML file
//! embedded at compile time, which `DASHBOARD_CONFIG` can replace.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bird_strike_analytics::FigureStyle;
use bird_strike_incident_models::YearRange;
use bird_strike_server_models::ApiSlider;
use serde::Deserialize;
use thiserror::Error;

/// Dashboard presentation settings baked into the binary.
const DEFAULT_DASHBOARD_TOML: &str = include_str!("../dashboard.toml");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_INCIDENTS_PATH: &str = "data/bird_strikes.csv";
const DEFAULT_STATE_CODES_PATH: &str = "data/state_codes.csv";
const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid dashboard config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The slider bounds are inverted.
    #[error("Year slider minimum {min} is after maximum {max}")]
    InvalidYearBounds {
        /// Configured minimum.
        min: i32,
        /// Configured maximum.
        max: i32,
    },

    /// `PORT` is not a valid port number.
    #[error("Invalid port '{value}'")]
    InvalidPort {
        /// Raw environment value.
        value: String,
    },
}

/// Year slider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearsConfig {
    pub min: i32,
    pub max: i32,
}

/// Choropleth presentation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapConfig {
    pub title: String,
    pub colorscale: String,
    pub geo_scope: String,
}

/// Presentation settings for the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Page heading.
    pub title: String,
    /// Page subheading.
    pub subtitle: String,
    pub years: YearsConfig,
    pub map: MapConfig,
}

impl DashboardConfig {
    /// The settings embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_DASHBOARD_TOML)
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML does not match the expected
    /// shape or the year bounds are inverted.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        if config.years.min > config.years.max {
            return Err(ConfigError::InvalidYearBounds {
                min: config.years.min,
                max: config.years.max,
            });
        }
        Ok(config)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Full slider range, used when a request omits `from`/`to`.
    #[must_use]
    pub const fn year_range(&self) -> YearRange {
        YearRange::new(self.years.min, self.years.max)
    }

    /// Slider settings with one mark per year.
    #[must_use]
    pub fn slider(&self) -> ApiSlider {
        let marks: BTreeMap<i32, String> = (self.years.min..=self.years.max)
            .map(|year| (year, year.to_string()))
            .collect();
        ApiSlider {
            min: self.years.min,
            max: self.years.max,
            marks,
            value: [self.years.min, self.years.max],
        }
    }

    #[must_use]
    pub fn figure_style(&self) -> FigureStyle {
        FigureStyle {
            map_title: self.map.title.clone(),
            colorscale: self.map.colorscale.clone(),
            geo_scope: self.map.geo_scope.clone(),
        }
    }
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Incident CSV export.
    pub incidents_path: PathBuf,
    /// `state,code` CSV.
    pub state_codes_path: PathBuf,
    /// Front end directory served at `/` when it exists.
    pub static_dir: PathBuf,
    pub dashboard: DashboardConfig,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is invalid or the dashboard
    /// config cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of an
    /// environment variable if it is set.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        let path_or = |key: &str, default: &str| {
            lookup(key).map_or_else(|| PathBuf::from(default), PathBuf::from)
        };

        let dashboard = match lookup("DASHBOARD_CONFIG") {
            Some(path) => DashboardConfig::load(Path::new(&path))?,
            None => DashboardConfig::embedded()?,
        };

        Ok(Self {
            bind_addr,
            port,
            incidents_path: path_or("INCIDENTS_PATH", DEFAULT_INCIDENTS_PATH),
            state_codes_path: path_or("STATE_CODES_PATH", DEFAULT_STATE_CODES_PATH),
            static_dir: path_or("STATIC_DIR", DEFAULT_STATIC_DIR),
            dashboard,
        })
    }
}
