use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::session::{parse_max_tokens, parse_temperature, SessionConfig};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_GREETING: &str =
    "Hi! 👋 I'm your markdown knowledge chatbot. Upload a markdown file or start chatting.";
pub const DEFAULT_KNOWLEDGE_EXTENSION: &str = ".md";

/// Top-level config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatmarkConfig {
    pub version: String,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ChatmarkConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            gateway: GatewayConfig::default(),
            session: SessionDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChatmarkConfig {
    /// Read a value by dotted key, e.g. `gateway.model`
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["gateway", "base_url"] => Some(self.gateway.base_url.clone()),
            ["gateway", "model"] => Some(self.gateway.model.clone()),
            ["gateway", "timeout_seconds"] => Some(self.gateway.timeout_seconds.to_string()),
            ["gateway", "credential_env"] => Some(self.gateway.credential_env.join(",")),
            ["session", "greeting"] => Some(self.session.greeting.clone()),
            ["session", "knowledge_extension"] => Some(self.session.knowledge_extension.clone()),
            ["session", "temperature"] => Some(self.session.temperature.to_string()),
            ["session", "max_tokens"] => Some(self.session.max_tokens.to_string()),
            ["session", "system_prompt"] => Some(self.session.system_prompt.clone()),
            ["logging", "level"] => Some(self.logging.level.clone()),
            ["logging", "json_format"] => Some(self.logging.json_format.to_string()),
            _ => None,
        }
    }

    /// Set a value by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["gateway", "base_url"] => {
                self.gateway.base_url = value.trim_end_matches('/').to_string();
            }
            ["gateway", "model"] => {
                self.gateway.model = value.to_string();
            }
            ["gateway", "timeout_seconds"] => {
                self.gateway.timeout_seconds = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?;
            }
            ["gateway", "credential_env"] => {
                self.gateway.credential_env = value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["session", "greeting"] => {
                self.session.greeting = value.to_string();
            }
            ["session", "knowledge_extension"] => {
                self.session.knowledge_extension = value.to_string();
            }
            ["session", "temperature"] => {
                self.session.temperature = parse_temperature(value)?;
            }
            ["session", "max_tokens"] => {
                self.session.max_tokens = parse_max_tokens(value)?;
            }
            ["session", "system_prompt"] => {
                self.session.system_prompt = value.to_string();
            }
            ["logging", "level"] => {
                self.logging.level = value.to_string();
            }
            ["logging", "json_format"] => {
                self.logging.json_format = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid boolean: {}", value))
                })?;
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

/// Completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Environment variables checked, in order, for the API key
    #[serde(default = "default_credential_env")]
    pub credential_env: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_credential_env() -> Vec<String> {
    vec!["CHATMARK_API_KEY".to_string(), "OPENAI_API_KEY".to_string()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
            credential_env: default_credential_env(),
        }
    }
}

impl GatewayConfig {
    /// Look up the credential once; first non-empty variable wins.
    pub fn resolve_credential(&self) -> Option<Credential> {
        self.credential_env.iter().find_map(|name| {
            let credential = std::env::var(name).ok().and_then(Credential::new);
            if credential.is_some() {
                tracing::debug!("Using credential from ${}", name);
            }
            credential
        })
    }
}

/// Per-session defaults applied when a session is created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDefaults {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_knowledge_extension")]
    pub knowledge_extension: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub system_prompt: String,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_knowledge_extension() -> String {
    DEFAULT_KNOWLEDGE_EXTENSION.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    800
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            knowledge_extension: default_knowledge_extension(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: String::new(),
        }
    }
}

impl SessionDefaults {
    /// Initial [`SessionConfig`] for a new session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt: self.system_prompt.clone(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
