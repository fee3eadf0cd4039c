use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScribeError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_model_base_url() -> String {
    DEFAULT_MODEL_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_model_base_url(),
            model: default_model(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

impl ScribeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScribeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| ScribeError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.model.api_key = config.model.api_key.take().filter(|key| is_resolved(key));
        Ok(config)
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScribeError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Falls back to `GEMINI_API_KEY` when the file did not provide a key.
    pub fn with_env_credential(mut self) -> Self {
        if self.model.api_key.is_none() {
            self.model.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        self
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_socket_addr("server.bind", &self.server.bind)?;
        crate::utils::validation::validate_positive_number(
            "server.max_body_bytes",
            self.server.max_body_bytes,
            1,
        )?;
        crate::utils::validation::validate_url("model.base_url", &self.model.base_url)?;
        crate::utils::validation::validate_non_empty_string("model.model", &self.model.model)?;

        if let Some(timeout) = self.model.timeout_seconds {
            crate::utils::validation::validate_range("model.timeout_seconds", timeout, 1, 600)?;
        }

        if self.model.api_key.is_none() {
            tracing::warn!(
                "{} is not set; every image will come back as a fallback note",
                API_KEY_ENV
            );
        }

        Ok(())
    }
}

// An unset `${VAR}` survives substitution verbatim.
fn is_resolved(value: &str) -> bool {
    !value.trim().is_empty() && !value.starts_with("${")
}

impl ConfigProvider for ScribeConfig {
    fn model_base_url(&self) -> &str {
        &self.model.base_url
    }

    fn model_name(&self) -> &str {
        &self.model.model
    }

    fn api_key(&self) -> Option<&str> {
        self.model.api_key.as_deref()
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.model.timeout_seconds
    }
}

impl Validate for ScribeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
