//! ブラウザ設定（localStorage）

use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "twinfinder.settings";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebSettings {
    pub api_key: String,
}

impl WebSettings {
    /// 未保存・破損時は既定値
    pub fn load() -> Self {
        LocalStorage::get(STORAGE_KEY).unwrap_or_default()
    }

    pub fn save(&self) {
        if let Err(e) = LocalStorage::set(STORAGE_KEY, self) {
            log::warn!("failed to save settings: {}", e);
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
