//! Dashboard Configuration Module
//! Input file location, column bindings and control defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "ubs_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Separator must be a single ASCII character, got {0:?}")]
    InvalidSeparator(char),
}

/// Names of the source columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub state: String,
    pub municipality: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            state: "Nome_UF".to_string(),
            municipality: "Nome_Município".to_string(),
            latitude: "LATITUDE".to_string(),
            longitude: "LONGITUDE".to_string(),
        }
    }
}

impl ColumnConfig {
    /// All required column names, in source order of importance.
    pub fn required(&self) -> [&str; 4] {
        [
            self.state.as_str(),
            self.municipality.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub separator: char,
    pub columns: ColumnConfig,
    /// Initial position of the minimum-units-per-municipality slider.
    pub default_min_count: u32,
    pub map_preview_rows: usize,
    /// Rows drawn in the filtered record table.
    pub table_row_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("ubs_atualizado.csv"),
            separator: ';',
            columns: ColumnConfig::default(),
            default_min_count: 300,
            map_preview_rows: 10,
            table_row_limit: 500,
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit file, else from `ubs_dashboard.json` when present,
    /// else fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load_from_file(fallback)
                } else {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.separator_byte()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Field separator as the single byte the CSV reader expects.
    pub fn separator_byte(&self) -> Result<u8, ConfigError> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(ConfigError::InvalidSeparator(self.separator))
        }
    }
}
