use crate::types::Turn;

/// Chat completion request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub options: ChatOptions,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            options: ChatOptions::default(),
        }
    }

    /// Add a system turn; empty text adds nothing
    pub fn with_system(mut self, system_text: &str) -> Self {
        if !system_text.is_empty() {
            self.messages.push(Turn::system(system_text));
        }
        self
    }

    /// Add a turn to the request
    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.messages.push(turn);
        self
    }

    /// Add multiple turns
    pub fn with_turns(mut self, turns: impl IntoIterator<Item = Turn>) -> Self {
        self.messages.extend(turns);
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.options.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.options.max_tokens = Some(max);
        self
    }
}

/// Sampling options for chat completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}
