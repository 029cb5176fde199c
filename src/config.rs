use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::RashodyError;

const APP_DIR: &str = "rashody";

/// Application settings; every field falls back to a default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RashodyConfig {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub currency: String,
    pub description_width: usize,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for RashodyConfig {
    fn default() -> Self {
        Self {
            data_file: data_dir().join("expenses.json"),
            log_dir: data_dir().join("logs"),
            log_level: "info".to_string(),
            currency: "р".to_string(),
            description_width: 25,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Reads the config at `path`, or the defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<RashodyConfig, RashodyError> {
    if !path.exists() {
        return Ok(RashodyConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config: RashodyConfig = toml::from_str(&contents)?;
    info!("event=config_load module=config path={}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RashodyConfig::default());
        assert_eq!(config.description_width, 25);
        assert_eq!(config.currency, "р");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "currency = \"₽\"\ndata_file = \"/tmp/x.json\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.currency, "₽");
        assert_eq!(config.data_file, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "currency = [").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(RashodyError::Deserialization(_))
        ));
    }
}
