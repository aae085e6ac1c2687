use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// User-supplied text injected into the system prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub name: String,
    pub contents: String,
    pub loaded_at: DateTime<Local>,
}

impl KnowledgeDocument {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            loaded_at: Local::now(),
        }
    }

    /// Assistant message announcing the upload
    pub fn announcement(&self) -> String {
        format!("📂 Uploaded markdown knowledge base: **{}**", self.name)
    }
}

/// Case-sensitive suffix match: `notes.md` passes, `notes.MD` and `notes.txt` do not.
pub fn is_supported(name: &str, extension: &str) -> bool {
    !extension.is_empty() && name.ends_with(extension)
}
