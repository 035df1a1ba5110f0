use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TopicError;
use crate::models::ApiConfig;

pub const DEFAULT_API_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "Qwen/Qwen3-8B";

/// Main configuration structure for the topic generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiDefaults,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per durable key
    pub data_dir: PathBuf,
}

/// Values used when no API config has been saved yet
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiDefaults {
    pub api_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub enable_thinking: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("social-topics"))
            .unwrap_or_else(|| PathBuf::from(".social-topics"));
        Self { data_dir }
    }
}

impl Default for ApiDefaults {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for ApiDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiDefaults")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            enable_thinking: false,
        }
    }
}

impl ApiDefaults {
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            api: ApiDefaults::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!("Loaded .env from: {}", path.display()),
            Err(_) => tracing::debug!("No .env file found - continuing with env vars only"),
        }

        let config_path =
            env::var("TOPICS_CONFIG_PATH").unwrap_or_else(|_| "topics.yaml".to_string());

        let mut config = Self::from_file(Path::new(&config_path));
        config.apply_env_overrides(|key| env::var(key).ok());

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    fn from_file(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {} - using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides through `lookup`
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("TOPICS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        if let Some(url) = lookup("TOPICS_API_URL") {
            self.api.api_url = url;
        }
        if let Some(model) = lookup("TOPICS_MODEL") {
            self.api.model = model;
        }
        if let Some(key) = lookup("TOPICS_API_KEY") {
            self.api.api_key = key;
        }

        if let Some(max_tokens) = lookup("TOPICS_MAX_TOKENS") {
            match max_tokens.parse() {
                Ok(v) => self.generation.max_tokens = v,
                Err(_) => tracing::warn!("Ignoring invalid TOPICS_MAX_TOKENS: {}", max_tokens),
            }
        }
        if let Some(thinking) = lookup("TOPICS_ENABLE_THINKING") {
            match thinking.parse() {
                Ok(v) => self.generation.enable_thinking = v,
                Err(_) => tracing::warn!("Ignoring invalid TOPICS_ENABLE_THINKING: {}", thinking),
            }
        }
    }

    fn validate(&self) -> Result<(), TopicError> {
        if self.generation.max_tokens == 0 {
            return Err(TopicError::Config("generation.max_tokens cannot be 0".to_string()));
        }
        if self.api.api_url.trim().is_empty() {
            return Err(TopicError::Config("api.api_url is empty".to_string()));
        }
        if self.api.model.trim().is_empty() {
            return Err(TopicError::Config("api.model is empty".to_string()));
        }
        Ok(())
    }
}
