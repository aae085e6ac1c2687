use chatmark_config::SessionConfig;
use chatmark_core::types::{Message, Turn};

use crate::knowledge::KnowledgeDocument;

/// Separator placed between the system prompt and the knowledge document
pub const KNOWLEDGE_HEADER: &str = "\nKnowledge Base:\n";

/// Everything the gateway needs for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    /// May be empty, in which case no system turn is sent
    pub system_text: String,
    pub turns: Vec<Turn>,
}

impl ComposedPrompt {
    /// Full outgoing turn sequence, system turn first when present
    pub fn request_turns(&self) -> Vec<Turn> {
        let system = (!self.system_text.is_empty()).then(|| Turn::system(self.system_text.as_str()));
        system.into_iter().chain(self.turns.iter().cloned()).collect()
    }
}

/// Build the system text and wire turns from session state. Reads only.
pub fn compose(
    config: &SessionConfig,
    knowledge: Option<&KnowledgeDocument>,
    log: &[Message],
) -> ComposedPrompt {
    let mut system_text = config.system_prompt.clone();
    if let Some(doc) = knowledge {
        system_text.push_str(KNOWLEDGE_HEADER);
        system_text.push_str(&doc.contents);
    }

    ComposedPrompt {
        system_text,
        turns: log.iter().map(Turn::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatmark_core::types::Role;

    fn config(system_prompt: &str) -> SessionConfig {
        SessionConfig {
            system_prompt: system_prompt.to_string(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_empty_when_nothing_set() {
        let prompt = compose(&config(""), None, &[]);
        assert_eq!(prompt.system_text, "");
        assert!(prompt.request_turns().is_empty());
    }

    #[test]
    fn test_system_prompt_only() {
        let prompt = compose(&config("Be brief."), None, &[]);
        assert_eq!(prompt.system_text, "Be brief.");
    }

    #[test]
    fn test_knowledge_appended() {
        let doc = KnowledgeDocument::new("notes.md", "X");
        let prompt = compose(&config("Be brief."), Some(&doc), &[]);
        assert_eq!(prompt.system_text, "Be brief.\nKnowledge Base:\nX");

        let prompt = compose(&config(""), Some(&doc), &[]);
        assert_eq!(prompt.system_text, "\nKnowledge Base:\nX");
        assert!(prompt.system_text.ends_with("Knowledge Base:\nX"));
    }

    #[test]
    fn test_turns_preserve_order_and_drop_metadata() {
        let log = vec![
            Message::assistant("Hi!"),
            Message::user("question"),
            Message::assistant("answer"),
        ];
        let prompt = compose(&config(""), None, &log);
        assert_eq!(
            prompt.turns,
            vec![
                Turn::new(Role::Assistant, "Hi!"),
                Turn::new(Role::User, "question"),
                Turn::new(Role::Assistant, "answer"),
            ]
        );
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_request_turns_put_system_first() {
        let log = vec![Message::user("q")];
        let prompt = compose(&config("sys"), None, &log);
        let turns = prompt.request_turns();
        assert_eq!(turns[0], Turn::system("sys"));
        assert_eq!(turns[1], Turn::new(Role::User, "q"));
    }
}
