pub mod types;
pub mod chat;

pub use types::{Message, MessageId, Role, Turn};

pub use chat::{
    ChatRequest,
    ChatResponse,
    ChatOptions,
    ChatUsage,
    FinishReason,
};
