use chatmark_config::GatewayConfig;
use std::time::Duration;

/// Provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider ID
    pub provider_id: String,
    /// Base URL for the API, without trailing slash
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Create a new provider config
    pub fn new(provider_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base_url}/chat/completions`
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_id: "openai".to_string(),
            base_url: chatmark_config::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl From<&GatewayConfig> for ProviderConfig {
    fn from(config: &GatewayConfig) -> Self {
        ProviderConfig::new("openai", config.base_url.as_str())
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }
}
