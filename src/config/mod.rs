use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{EditorialError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "editorial-board.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Provider-qualified model id, e.g. `groq/llama-3.3-70b-versatile`
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub api_base: String,
    pub max_results: u32,
    pub search_depth: String, // "basic", "advanced"
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_token: Option<String>,
    /// Browser sessions whose last result is kept in memory
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_sessions() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                model: "groq/llama-3.3-70b-versatile".to_string(),
                api_key: String::new(),
                api_base: "https://api.groq.com/openai/v1".to_string(),
                temperature: 0.7,
                max_tokens: None,
                request_timeout_secs: 120,
            },
            search: SearchConfig {
                api_key: String::new(),
                api_base: "https://api.tavily.com".to_string(),
                max_results: 5,
                search_depth: "basic".to_string(),
                request_timeout_secs: 30,
            },
            output: OutputConfig {
                directory: PathBuf::from("output"),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
                api_token: None,
                max_sessions: default_max_sessions(),
            },
        }
    }
}

impl Config {
    /// Overlay environment variables, read through `lookup`, onto the loaded values.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("MODEL_NAME") {
            self.llm.model = model;
        }
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(base) = lookup("LLM_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(key) = lookup("TAVILY_API_KEY") {
            self.search.api_key = key;
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            // an empty value means the working directory
            self.output.directory = if dir.trim().is_empty() {
                PathBuf::from(".")
            } else {
                PathBuf::from(dir)
            };
        }
        if let Some(host) = lookup("EDITORIAL_BOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EDITORIAL_BOARD_PORT") {
            self.server.port = port.parse().map_err(|_| {
                EditorialError::ConfigError(format!("EDITORIAL_BOARD_PORT '{}' is not a valid port", port))
            })?;
        }
        if let Some(token) = lookup("EDITORIAL_BOARD_API_TOKEN") {
            self.server.api_token = Some(token).filter(|t| !t.is_empty());
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[async_trait::async_trait]
pub trait ConfigManager {
    async fn load_config(&self) -> Result<Config>;
    async fn save_config(&self, config: &Config) -> Result<()>;
    fn validate_config(&self, config: &Config) -> Result<()>;
}

/// Source of environment overrides, `std::env::var` outside tests.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct FileConfigManager {
    config_path: PathBuf,
    env_lookup: EnvLookup,
}

impl FileConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self::with_env_lookup(config_path, Arc::new(|key: &str| std::env::var(key).ok()))
    }

    pub fn with_env_lookup(config_path: PathBuf, env_lookup: EnvLookup) -> Self {
        Self {
            config_path,
            env_lookup,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

#[async_trait::async_trait]
impl ConfigManager for FileConfigManager {
    async fn load_config(&self) -> Result<Config> {
        info!("Loading configuration from {:?}", self.config_path);

        let mut config = if self.config_path.exists() {
            let config_content = fs::read_to_string(&self.config_path)
                .map_err(|e| EditorialError::ConfigError(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&config_content)
                .map_err(|e| EditorialError::ConfigError(format!("Failed to parse TOML config: {}", e)))?
        } else {
            warn!("Configuration file {:?} not found, using defaults", self.config_path);
            Config::default()
        };

        config.apply_overrides_from(|key| (self.env_lookup)(key))?;
        self.validate_config(&config)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    async fn save_config(&self, config: &Config) -> Result<()> {
        info!("Saving configuration to {:?}", self.config_path);

        let toml_content = toml::to_string_pretty(config)
            .map_err(|e| EditorialError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| EditorialError::ConfigError(format!("Failed to create config directory: {}", e)))?;
        }

        fs::write(&self.config_path, toml_content)
            .map_err(|e| EditorialError::ConfigError(format!("Failed to write config file: {}", e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        debug!("Validating configuration");

        // llm
        if config.llm.model.trim().is_empty() {
            return Err(EditorialError::ConfigError("llm.model cannot be empty".to_string()));
        }
        if !Self::is_http_url(&config.llm.api_base) {
            return Err(EditorialError::ConfigError(
                "llm.api_base must start with http:// or https://".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(EditorialError::ConfigError(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if config.llm.request_timeout_secs == 0 {
            return Err(EditorialError::ConfigError(
                "llm.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        // search
        if !Self::is_http_url(&config.search.api_base) {
            return Err(EditorialError::ConfigError(
                "search.api_base must start with http:// or https://".to_string(),
            ));
        }
        if config.search.max_results == 0 || config.search.max_results > 20 {
            return Err(EditorialError::ConfigError(
                "search.max_results must be between 1 and 20".to_string(),
            ));
        }
        let valid_depths = ["basic", "advanced"];
        if !valid_depths.contains(&config.search.search_depth.as_str()) {
            return Err(EditorialError::ConfigError(format!(
                "Invalid search_depth '{}', must be one of: {:?}",
                config.search.search_depth, valid_depths
            )));
        }
        if config.search.request_timeout_secs == 0 {
            return Err(EditorialError::ConfigError(
                "search.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        // output
        if config.output.directory.as_os_str().is_empty() {
            return Err(EditorialError::ConfigError("output.directory cannot be empty".to_string()));
        }

        // server
        if config.server.port < 1024 {
            return Err(EditorialError::ConfigError(
                "server.port must be between 1024 and 65535".to_string(),
            ));
        }
        if config.server.max_sessions == 0 {
            return Err(EditorialError::ConfigError(
                "server.max_sessions must be greater than 0".to_string(),
            ));
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

impl FileConfigManager {
    fn is_http_url(value: &str) -> bool {
        value.starts_with("http://") || value.starts_with("https://")
    }
}
