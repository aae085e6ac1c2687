use chatmark_core::chat::{ChatRequest, ChatResponse, ChatUsage, FinishReason};
use chatmark_core::types::Turn;
use serde_json::{json, Value};

use crate::error::ConversionError;
use crate::transformer::SchemaTransformer;

/// OpenAI-compatible chat completions schema
pub struct OpenAiTransformer;

impl OpenAiTransformer {
    pub fn new() -> Self {
        Self
    }

    fn convert_turn(&self, turn: &Turn) -> Value {
        json!({
            "role": turn.role.as_str(),
            "content": turn.content,
        })
    }
}

impl Default for OpenAiTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTransformer for OpenAiTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_request(&self, request: &ChatRequest) -> Result<Value, ConversionError> {
        if request.model.is_empty() {
            return Err(ConversionError::InvalidFormat("model is empty".to_string()));
        }

        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|turn| self.convert_turn(turn))
            .collect();

        let mut body = json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(temp) = request.options.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = request.options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        Ok(body)
    }

    /// A body without `choices[0].message.content` is still a response, just one with no text.
    fn parse_response(&self, data: &Value) -> Result<ChatResponse, ConversionError> {
        if !data.is_object() {
            return Err(ConversionError::InvalidFormat(format!(
                "expected a JSON object, got {}",
                data
            )));
        }

        let id = data["id"].as_str().unwrap_or_default().to_string();
        let model = data["model"].as_str().unwrap_or_default().to_string();

        let choice = data["choices"].get(0);
        let content = choice
            .and_then(|c| c["message"]["content"].as_str())
            .map(str::to_string);

        let usage = data
            .get("usage")
            .map(|u| ChatUsage {
                input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
                output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
                total_tokens: u["total_tokens"].as_u64().unwrap_or(0) as u32,
            })
            .unwrap_or_default();

        let finish_reason =
            FinishReason::from_wire(choice.and_then(|c| c["finish_reason"].as_str()));

        Ok(ChatResponse::new(id, model, content)
            .with_usage(usage)
            .with_finish_reason(finish_reason))
    }
}
