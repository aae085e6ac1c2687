use async_trait::async_trait;
use chatmark_config::Credential;
use chatmark_core::chat::{ChatRequest, ChatResponse};
use reqwest::{header, Client};

use crate::error::{ConversionError, LLMError, Result};
use crate::provider::{CompletionProvider, ProviderConfig};
use crate::transformer::SchemaTransformer;

/// Base provider implementation.
/// Handles the HTTP round trip and delegates schema transformation.
pub struct BaseProvider<T: SchemaTransformer> {
    config: ProviderConfig,
    http_client: Client,
    transformer: T,
}

impl<T: SchemaTransformer> BaseProvider<T> {
    /// Create a new base provider; the HTTP client is built once here
    pub fn new(config: ProviderConfig, transformer: T) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LLMError::Config(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            transformer,
        })
    }

    /// Get the provider ID
    pub fn provider_id(&self) -> &str {
        self.transformer.provider_id()
    }

    /// Get the config
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn build_headers(&self, credential: &Credential) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let mut auth = header::HeaderValue::from_str(&credential.bearer())
            .map_err(|e| LLMError::Config(format!("Invalid credential: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Send a non-streaming request
    pub async fn send_request(
        &self,
        credential: &Credential,
        request: ChatRequest,
    ) -> Result<ChatResponse> {
        let body = self.transformer.transform_request(&request)?;
        let headers = self.build_headers(credential)?;
        let url = self.config.completions_url();

        log::debug!(
            "POST {} model={} turns={}",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Completion endpoint returned {}: {}", status, error_text);
            return Err(LLMError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let text = response.text().await?;
        let response_data: serde_json::Value =
            serde_json::from_str(&text).map_err(ConversionError::from)?;

        let response = self.transformer.parse_response(&response_data)?;
        log::debug!(
            "Completion finished: id={} finish_reason={:?} tokens={}",
            response.id,
            response.finish_reason,
            response.usage.total_tokens
        );
        Ok(response)
    }
}

#[async_trait]
impl<T: SchemaTransformer> CompletionProvider for BaseProvider<T> {
    fn provider_id(&self) -> &str {
        self.transformer.provider_id()
    }

    async fn chat(&self, credential: &Credential, request: ChatRequest) -> Result<ChatResponse> {
        self.send_request(credential, request).await
    }
}
