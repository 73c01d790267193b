//! Station registry configuration - parses stations.toml
//!
//! Lists which monitoring stations are loaded at startup and where their
//! files live, so stations can be added without recompiling.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Stations of the Beijing multi-site air-quality data set, plus the
/// pre-averaged `Average` table.
pub const DEFAULT_STATIONS: [&str; 13] = [
    "Average",
    "Aotizhongxin",
    "Changping",
    "Dingling",
    "Dongsi",
    "Guanyuan",
    "Gucheng",
    "Huairou",
    "Nongzhanguan",
    "Shunyi",
    "Tiantan",
    "Wanliu",
    "Wanshouxigong",
];

/// Root configuration structure for TOML parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one file per station.
    pub data_dir: PathBuf,
    /// File extension of the station files (`csv` or `json`).
    pub extension: String,
    /// Name of the timestamp column in every station file.
    pub timestamp_column: String,
    /// Station names, in display order. `<data_dir>/<name>.<extension>` is loaded for each.
    pub stations: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            extension: "csv".to_string(),
            timestamp_column: "year_month".to_string(),
            stations: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("parsing station configuration")
    }

    /// Load a configuration file. Relative `data_dir` paths are resolved
    /// against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        log::debug!(
            "config {}: {} stations under {}",
            path.display(),
            config.stations.len(),
            config.data_dir.display()
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Location of the file for one station.
    pub fn source_path(&self, station: &str) -> PathBuf {
        self.data_dir.join(format!("{station}.{}", self.extension))
    }
}
