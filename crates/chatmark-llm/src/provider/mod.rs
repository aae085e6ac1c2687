pub mod base;
pub mod config;

pub use base::BaseProvider;
pub use config::ProviderConfig;

use async_trait::async_trait;
use chatmark_config::Credential;
use chatmark_core::chat::{ChatRequest, ChatResponse};

use crate::error::Result;

/// Something that can answer a chat completion request
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider ID
    fn provider_id(&self) -> &str {
        "custom"
    }

    /// Send a chat request and get a complete response. One attempt, no retry.
    async fn chat(&self, credential: &Credential, request: ChatRequest) -> Result<ChatResponse>;
}
