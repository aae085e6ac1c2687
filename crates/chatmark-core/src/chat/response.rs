/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishReason {
    #[default]
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_wire(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") | None => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        }
    }
}

/// Chat completion response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    /// First choice's message content; `None` when the endpoint returned no usable text
    pub content: Option<String>,
    pub usage: ChatUsage,
    pub finish_reason: FinishReason,
}

impl ChatResponse {
    /// Create a new response
    pub fn new(id: impl Into<String>, model: impl Into<String>, content: Option<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            content,
            usage: ChatUsage::default(),
            finish_reason: FinishReason::Stop,
        }
    }

    /// Set usage
    pub fn with_usage(mut self, usage: ChatUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Set finish reason
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    /// Non-empty reply text, if any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl ChatUsage {
    pub fn new(input: u32, output: u32) -> Self {
        Self {
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
        }
    }
}
