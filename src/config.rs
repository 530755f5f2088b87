use crate::error::{Result, TwinFinderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use twinfinder_common::gemini::{DEFAULT_HIGHLIGHT_MODEL, DEFAULT_SCORE_MODEL};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub score_model: String,
    pub highlight_model: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            score_model: DEFAULT_SCORE_MODEL.into(),
            highlight_model: DEFAULT_HIGHLIGHT_MODEL.into(),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TwinFinderError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("twinfinder").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// 環境変数を優先し、なければ設定ファイルの値
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .into_iter()
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(TwinFinderError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.score_model, "gemini-2.0-flash");
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_key": "abc", "timeout_seconds": 30}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.highlight_model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_key: Some("key-123".into()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_env_key_takes_precedence() {
        let config = Config {
            api_key: Some("from-file".into()),
            ..Config::default()
        };
        assert_eq!(config.resolve_api_key(Some("from-env".into())).unwrap(), "from-env");
        assert_eq!(config.resolve_api_key(Some("  ".into())).unwrap(), "from-file");
        assert_eq!(config.resolve_api_key(None).unwrap(), "from-file");
    }

    #[test]
    fn test_missing_key() {
        let config = Config::default();
        assert!(matches!(config.resolve_api_key(None), Err(TwinFinderError::MissingApiKey)));
    }
}
