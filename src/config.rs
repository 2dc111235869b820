use crate::layers::LayerVisibility;
use crate::types::Category;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub sampling: SamplingConfig,
    pub output: OutputConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Fixed seed for reproducible positions. Unset means a fresh sample each run.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub geojson: PathBuf,
    pub comparison_csv: PathBuf,
    pub charts_json: PathBuf,
    pub tile_dir: PathBuf,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            geojson: PathBuf::from("output/samples.geojson"),
            comparison_csv: PathBuf::from("output/comparison.csv"),
            charts_json: PathBuf::from("output/charts.json"),
            tile_dir: PathBuf::from("output/tiles"),
            min_zoom: 9,
            max_zoom: 13,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Category layers hidden when the map first opens.
    pub hidden: Vec<Category>,
}

impl MapConfig {
    pub fn layer_visibility(&self) -> LayerVisibility {
        LayerVisibility::from_hidden(&self.hidden)
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            warn!("Config file {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }
}
