//! Settings for hosts embedding the ledger.
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`config/khata.toml` unless another path is given), then `KHATA__*`
//! environment variables (`KHATA__ADVISOR__MODEL=...`).
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{Language, ResultEngine, storage::FileStorage};

const DEFAULT_CONFIG_PATH: &str = "config/khata.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub storage: StorageSettings,
    pub advisor: AdvisorSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the khata crates (`error`..`trace`).
    pub level: String,
    pub language: Language,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            language: Language::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one JSON file per stored value.
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl StorageSettings {
    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(&self.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    pub base_url: String,
    pub model: String,
    /// Falls back to the `GEMINI_API_KEY` and `API_KEY` environment variables.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl AdvisorSettings {
    /// First non-blank key out of the configured value, `GEMINI_API_KEY` and
    /// `API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// [`resolve_api_key`](Self::resolve_api_key) with an explicit
    /// environment lookup.
    pub fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let usable = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(usable)
            .or_else(|| env("GEMINI_API_KEY").filter(usable))
            .or_else(|| env("API_KEY").filter(usable))
    }
}

impl Settings {
    /// Loads settings from `path` (or the default path) and the environment.
    /// A missing file is not an error.
    pub fn new(path: Option<&str>) -> ResultEngine<Self> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("KHATA").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
