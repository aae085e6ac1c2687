pub mod openai;

pub use openai::OpenAiTransformer;

use chatmark_core::chat::{ChatRequest, ChatResponse};
use serde_json::Value;

use crate::error::ConversionError;

/// Converts between internal request/response types and a provider's wire schema
pub trait SchemaTransformer: Send + Sync {
    /// Get the provider ID
    fn provider_id(&self) -> &str;

    /// Transform request to provider-specific format
    fn transform_request(&self, request: &ChatRequest) -> Result<Value, ConversionError>;

    /// Parse a complete response
    fn parse_response(&self, data: &Value) -> Result<ChatResponse, ConversionError>;
}
