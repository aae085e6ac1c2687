use async_trait::async_trait;
use chatmark_config::{Credential, GatewayConfig};
use chatmark_core::chat::{ChatRequest, ChatResponse};

use crate::error::Result;
use crate::provider::{BaseProvider, CompletionProvider, ProviderConfig};
use crate::transformer::OpenAiTransformer;

/// OpenAI Provider.
/// Uses the OpenAI API or any endpoint speaking the same chat completions schema.
pub struct OpenAiProvider {
    base: BaseProvider<OpenAiTransformer>,
}

impl OpenAiProvider {
    /// Create with custom configuration
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let base = BaseProvider::new(config, OpenAiTransformer::new())?;
        Ok(Self { base })
    }

    /// Create a provider for the public OpenAI endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(ProviderConfig::default())
    }

    /// Create with custom base URL (for Azure or other compatible APIs)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ProviderConfig::new("openai", base_url))
    }

    pub fn from_gateway_config(config: &GatewayConfig) -> Result<Self> {
        Self::with_config(ProviderConfig::from(config))
    }

    pub fn config(&self) -> &ProviderConfig {
        self.base.config()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn provider_id(&self) -> &str {
        self.base.provider_id()
    }

    async fn chat(&self, credential: &Credential, request: ChatRequest) -> Result<ChatResponse> {
        self.base.chat(credential, request).await
    }
}
