//! The single boundary between a chat session and the completion endpoint.
//!
//! [`CompletionGateway::complete`] always resolves to display-ready text: missing
//! credentials, transport failures and empty answers each map to a fixed reply.

use chatmark_config::{Credential, GatewayConfig};
use chatmark_core::chat::ChatRequest;
use chatmark_core::types::Turn;
use std::sync::Arc;

use crate::error::Result;
use crate::provider::CompletionProvider;
use crate::providers::OpenAiProvider;

/// Reply used when no credential is configured. No request is made.
pub const ADVISORY_REPLY: &str = "👋 This would call the OpenAI API to answer using your uploaded markdown file as a knowledge base. (No API key set: please configure it in Settings or via the API key environment variable)";

/// Reply used when the endpoint answers without usable content
pub const EMPTY_REPLY: &str = "Sorry, I could not retrieve a response from the model.";

/// Prefix for replies describing a failed call
pub const ERROR_PREFIX: &str = "⚠️ Error talking to OpenAI API: ";

#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Gateway backed by the OpenAI-compatible HTTP provider
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let provider = OpenAiProvider::from_gateway_config(config)?;
        Ok(Self::new(Arc::new(provider), config.model.as_str()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    /// Build the outgoing request; an empty `system_text` adds no system turn.
    pub fn build_request(
        &self,
        system_text: &str,
        turns: &[Turn],
        temperature: f32,
        max_tokens: u32,
    ) -> ChatRequest {
        ChatRequest::new(self.model.as_str())
            .with_system(system_text)
            .with_turns(turns.iter().cloned())
            .temperature(temperature)
            .max_tokens(max_tokens)
    }

    /// Ask the endpoint for the next assistant reply. Never fails.
    pub async fn complete(
        &self,
        credential: Option<&Credential>,
        system_text: &str,
        turns: &[Turn],
        temperature: f32,
        max_tokens: u32,
    ) -> String {
        let Some(credential) = credential else {
            log::info!("No credential configured, returning advisory reply");
            return ADVISORY_REPLY.to_string();
        };

        let request = self.build_request(system_text, turns, temperature, max_tokens);

        match self.provider.chat(credential, request).await {
            Ok(response) => match response.text() {
                Some(text) => text.to_string(),
                None => {
                    log::warn!("Completion {} carried no content", response.id);
                    EMPTY_REPLY.to_string()
                }
            },
            Err(e) => {
                log::error!("Completion via {} failed: {}", self.provider.provider_id(), e);
                format!("{}{}", ERROR_PREFIX, e.user_message())
            }
        }
    }
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("provider", &self.provider.provider_id())
            .field("model", &self.model)
            .finish()
    }
}
