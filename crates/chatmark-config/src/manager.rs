use crate::config::{ChatmarkConfig, ConfigError, ConfigResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

static ENV_VAR_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}"));

/// Loads, validates and persists the config file
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<ChatmarkConfig>>,
}

impl ConfigManager {
    /// Load the config file, writing defaults if it does not exist
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            let content = Self::expand_env_vars(&content)?;
            let config: ChatmarkConfig = serde_json::from_str(&content)?;
            Self::validate(&config)?;
            config
        } else {
            info!("Config file not found, creating default config at {:?}", path);
            let default_config = ChatmarkConfig::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = serde_json::to_string_pretty(&default_config)?;
            tokio::fs::write(path, &content).await?;
            default_config
        };

        Ok(Self {
            path: path.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Load from `~/.chatmark/config.json`
    pub async fn load_default() -> ConfigResult<Self> {
        let config_path = Self::default_config_path()?;
        Self::load(&config_path).await
    }

    pub fn default_config_path() -> ConfigResult<PathBuf> {
        crate::default_config_path()
            .ok_or_else(|| ConfigError::InvalidPath("Could not find home directory".to_string()))
    }

    /// In-memory manager, mostly for tests
    pub fn new(config: ChatmarkConfig, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn get(&self) -> Arc<RwLock<ChatmarkConfig>> {
        Arc::clone(&self.config)
    }

    /// Clone of the current config
    pub async fn snapshot(&self) -> ChatmarkConfig {
        self.config.read().await.clone()
    }

    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.config.read().await;
        let content = serde_json::to_string_pretty(&*config)?;
        drop(config);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// Re-read the file from disk
    pub async fn reload(&self) -> ConfigResult<()> {
        if !self.path.exists() {
            return Err(ConfigError::InvalidPath(format!(
                "Config file not found: {:?}",
                self.path
            )));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let content = Self::expand_env_vars(&content)?;
        let new_config: ChatmarkConfig = serde_json::from_str(&content)?;

        Self::validate(&new_config)?;

        let mut config = self.config.write().await;
        *config = new_config;
        drop(config);

        info!("Config reloaded from {:?}", self.path);
        Ok(())
    }

    /// Mutate, validate, then persist. On validation failure nothing changes.
    pub async fn update<F>(&self, f: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut ChatmarkConfig),
    {
        let mut config = self.config.write().await;
        let mut candidate = config.clone();
        f(&mut candidate);
        Self::validate(&candidate)?;
        *config = candidate;
        drop(config);
        self.save().await
    }

    pub fn validate(config: &ChatmarkConfig) -> ConfigResult<()> {
        let gateway = &config.gateway;
        if !(gateway.base_url.starts_with("http://") || gateway.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "gateway.base_url must be an http(s) URL, got '{}'",
                gateway.base_url
            )));
        }

        if gateway.model.trim().is_empty() {
            return Err(ConfigError::Validation("gateway.model cannot be empty".to_string()));
        }

        if gateway.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "gateway.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // the greeting reseeds the log on reset, so it must be visible text
        if config.session.greeting.trim().is_empty() {
            return Err(ConfigError::Validation("session.greeting cannot be empty".to_string()));
        }

        let extension = &config.session.knowledge_extension;
        if !extension.starts_with('.') || extension.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "session.knowledge_extension must look like '.md', got '{}'",
                extension
            )));
        }

        Ok(())
    }

    /// Expand `${VAR}` and `${VAR:-default}`
    fn expand_env_vars(content: &str) -> ConfigResult<String> {
        let pattern = ENV_VAR_PATTERN
            .as_ref()
            .map_err(|e| ConfigError::Validation(format!("Invalid env var pattern: {}", e)))?;
        let mut result = content.to_string();

        for cap in pattern.captures_iter(content) {
            let full_match = &cap[0];
            let var_expr = &cap[1];

            let (var_name, default_value) = match var_expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr, None),
            };

            let replacement = match std::env::var(var_name) {
                Ok(val) => val,
                Err(_) => match default_value {
                    Some(default) => default.to_string(),
                    None => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
                },
            };

            result = result.replace(full_match, &replacement);
        }

        Ok(result)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_creates_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        let config = manager.snapshot().await;

        assert!(config_path.exists());
        assert_eq!(config, ChatmarkConfig::default());
    }

    #[tokio::test]
    async fn test_load_existing_with_env_expansion() {
        std::env::set_var("CHATMARK_TEST_MODEL", "gpt-4o-mini");
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(
            &config_path,
            r#"{"version":"0.1.0","gateway":{"model":"${CHATMARK_TEST_MODEL}","base_url":"${CHATMARK_TEST_UNSET_URL:-http://localhost:9000/v1}"}}"#,
        )
        .await
        .unwrap();

        let manager = ConfigManager::load(&config_path).await.unwrap();
        let config = manager.snapshot().await;
        assert_eq!(config.gateway.model, "gpt-4o-mini");
        assert_eq!(config.gateway.base_url, "http://localhost:9000/v1");
    }

    #[tokio::test]
    async fn test_missing_env_var_is_an_error() {
        let result = ConfigManager::expand_env_vars(r#"{"key": "${CHATMARK_TEST_DEFINITELY_UNSET}"}"#);
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound(name)) if name == "CHATMARK_TEST_DEFINITELY_UNSET"));
    }

    #[tokio::test]
    async fn test_update_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        manager.update(|c| c.session.system_prompt = "Be terse.".to_string()).await.unwrap();

        let reloaded = ConfigManager::load(&config_path).await.unwrap();
        assert_eq!(reloaded.snapshot().await.session.system_prompt, "Be terse.");
    }

    #[tokio::test]
    async fn test_invalid_update_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let result = manager.update(|c| c.gateway.timeout_seconds = 0).await;
        assert!(matches!(result, Err(ConfigError::Validation(_))));
        assert_eq!(manager.snapshot().await.gateway.timeout_seconds, 60);
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let mut edited = ChatmarkConfig::default();
        edited.session.max_tokens = 1500;
        tokio::fs::write(&config_path, serde_json::to_string(&edited).unwrap()).await.unwrap();

        manager.reload().await.unwrap();
        assert_eq!(manager.snapshot().await.session.max_tokens, 1500);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChatmarkConfig::default();
        assert!(ConfigManager::validate(&config).is_ok());

        config.gateway.base_url = "ftp://nope".to_string();
        assert!(ConfigManager::validate(&config).is_err());

        let mut config = ChatmarkConfig::default();
        config.session.knowledge_extension = "md".to_string();
        assert!(ConfigManager::validate(&config).is_err());

        let mut config = ChatmarkConfig::default();
        config.session.greeting = "  ".to_string();
        assert!(ConfigManager::validate(&config).is_err());
    }
}
