//! Configuration for the explorer binaries

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Looked up in the working directory by both binaries.
pub const CONFIG_FILE_NAME: &str = "player_market_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Failed to parse config {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Styling carried by every chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub caption_size: f64,
    pub label_size: f64,
    /// Fill opacity for bars, 0.0..=1.0
    pub bar_opacity: f64,
    /// RGB triples cycled through for series
    pub palette: Vec<[u8; 3]>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
            font_family: "sans-serif".to_string(),
            caption_size: 28.0,
            label_size: 14.0,
            bar_opacity: 0.7,
            palette: vec![
                [231, 76, 60],   // Red
                [46, 204, 113],  // Green
                [155, 89, 182],  // Purple
                [243, 156, 18],  // Orange
                [26, 188, 156],  // Teal
                [233, 30, 99],   // Pink
                [0, 188, 212],   // Cyan
                [255, 87, 34],   // Deep Orange
                [121, 85, 72],   // Brown
                [96, 125, 139],  // Blue Grey
            ],
        }
    }
}

impl ChartStyle {
    /// Palette entry for a series index, wrapping around.
    pub fn color(&self, index: usize) -> [u8; 3] {
        if self.palette.is_empty() {
            return [52, 152, 219];
        }
        self.palette[index % self.palette.len()]
    }
}

/// Settings shared by the batch analysis and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Players CSV
    pub data_path: PathBuf,
    /// Where batch charts are written
    pub output_dir: PathBuf,
    /// Open rendered charts with the system viewer
    pub open_after_render: bool,
    pub log_level: String,
    /// Countries pre-selected in the dashboard
    pub default_country_count: usize,
    pub value_bins: usize,
    pub batch_age_bins: usize,
    pub dashboard_age_bins: usize,
    pub style: ChartStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Data").join("players.csv"),
            output_dir: PathBuf::from("plots"),
            open_after_render: false,
            log_level: "info".to_string(),
            default_country_count: 15,
            value_bins: 30,
            batch_age_bins: 20,
            dashboard_age_bins: 30,
            style: ChartStyle::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Config from `player_market_explorer.json` in the working directory.
    pub fn load_default_location() -> Result<Self, ConfigError> {
        Self::load(Path::new(CONFIG_FILE_NAME))
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "data_path": "other.csv", "style": { "width": 640 } }"#)
                .unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.default_country_count, 15);
        assert_eq!(config.style.width, 640);
        assert_eq!(config.style.height, 720);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load(Path::new("definitely/not/here.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn log_level_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
        config.log_level = "DEBUG".to_string();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        config.log_level = "chatty".to_string();
        assert!(matches!(
            config.level_filter(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn palette_wraps() {
        let style = ChartStyle::default();
        assert_eq!(style.color(0), style.color(style.palette.len()));
    }
}
