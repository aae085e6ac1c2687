pub mod config;
pub mod credential;
pub mod manager;
pub mod session;

pub use config::{
    ChatmarkConfig, ConfigError, ConfigResult, GatewayConfig, LoggingConfig, SessionDefaults,
    DEFAULT_BASE_URL, DEFAULT_GREETING, DEFAULT_KNOWLEDGE_EXTENSION, DEFAULT_MODEL,
};
pub use credential::Credential;
pub use manager::ConfigManager;
pub use session::{ConfigField, ConfigUpdate, SessionConfig};

use std::path::PathBuf;

/// Chatmark config directory (`~/.chatmark`)
pub fn chatmark_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".chatmark"))
}

/// Default config file path (`~/.chatmark/config.json`)
pub fn default_config_path() -> Option<PathBuf> {
    chatmark_dir().map(|dir| dir.join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatmark_dir() {
        let dir = chatmark_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().to_string_lossy().contains(".chatmark"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with(".chatmark/config.json"));
    }
}
