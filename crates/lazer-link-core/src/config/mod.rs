//! Configuration and path detection

mod paths;

pub use paths::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::link::LinkMode;

/// Configuration for lazer-link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to osu!lazer data directory
    pub lazer_path: Option<PathBuf>,
    /// Default output directory for the projection
    pub output_path: Option<PathBuf>,
    /// Link or copy files
    pub link_mode: LinkMode,
    /// Default catalog export format
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lazer_path: detect_lazer_path(),
            output_path: None,
            link_mode: LinkMode::default(),
            export_format: ExportFormat::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lazer-link").join("config.json"))
    }

    /// Load config from disk, falling back to auto-detection if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load config from a specific file; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to disk
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| Error::Config("no configuration directory on this platform".into()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to a specific file, creating its parent directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"output_path": "/srv/songs", "link_mode": "copy"}"#).unwrap();
        assert_eq!(config.output_path, Some(PathBuf::from("/srv/songs")));
        assert_eq!(config.link_mode, LinkMode::Copy);
        assert_eq!(config.export_format, ExportFormat::Json);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = Config {
            lazer_path: Some(PathBuf::from("/home/me/.local/share/osu")),
            output_path: None,
            link_mode: LinkMode::Link,
            export_format: ExportFormat::Binary2,
        };
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"binary2\""));
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back.lazer_path, config.lazer_path);
        assert_eq!(back.export_format, ExportFormat::Binary2);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = Config {
            lazer_path: Some(PathBuf::from("/data/osu")),
            output_path: Some(PathBuf::from("/srv/songs")),
            link_mode: LinkMode::Copy,
            export_format: ExportFormat::JsonPretty,
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path);

        assert_eq!(loaded.lazer_path, config.lazer_path);
        assert_eq!(loaded.output_path, config.output_path);
        assert_eq!(loaded.link_mode, LinkMode::Copy);
        assert_eq!(loaded.export_format, ExportFormat::JsonPretty);
    }

    #[test]
    fn test_load_from_unreadable_falls_back() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = Config::load_from(&temp.path().join("missing.json"));
        assert_eq!(missing.output_path, None);

        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert_eq!(Config::load_from(&broken).link_mode, LinkMode::Link);
    }
}
