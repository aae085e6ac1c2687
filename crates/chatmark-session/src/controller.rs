//! # Session Controller
//!
//! Owns the message log, pending input, session config and knowledge document,
//! and drives the `idle -> awaiting_reply -> idle` cycle.

use std::path::Path;
use std::sync::Arc;

use chatmark_config::{
    ChatmarkConfig, ConfigField, ConfigUpdate, Credential, SessionConfig, SessionDefaults,
};
use chatmark_core::types::Message;
use chatmark_llm::{CompletionGateway, ERROR_PREFIX};
use chatmark_observability::create_session_span;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument};

use crate::compose::{compose, ComposedPrompt};
use crate::error::{SessionError, SessionResult};
use crate::knowledge::{self, KnowledgeDocument};

/// Where the session is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AwaitingReply,
}

/// Published after every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub message_count: usize,
    pub has_knowledge: bool,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    log: Vec<Message>,
    input: String,
    config: SessionConfig,
    knowledge: Option<KnowledgeDocument>,
    /// Bumped on every reset
    generation: u64,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            message_count: self.log.len(),
            has_knowledge: self.knowledge.is_some(),
        }
    }
}

struct ControllerInner {
    id: String,
    state: Mutex<SessionState>,
    gateway: CompletionGateway,
    credential: Option<Credential>,
    greeting: String,
    knowledge_extension: String,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl ControllerInner {
    /// Must be called with the state lock held so snapshots go out in transition order
    fn publish(&self, state: &SessionState) -> SessionSnapshot {
        let snapshot = state.snapshot();
        self.snapshot_tx.send_replace(snapshot);
        snapshot
    }

    /// Append the reply and return to idle
    fn land_reply(&self, reply: String, dispatched_in: u64) -> Message {
        let message = Message::assistant(reply);
        let mut state = self.state.lock();
        if state.generation != dispatched_in {
            warn!(
                session_id = %self.id,
                dispatched_in,
                current = state.generation,
                "Reply landed after a reset"
            );
        }
        state.log.push(message.clone());
        state.phase = SessionPhase::Idle;
        self.publish(&state);
        message
    }
}

/// A single conversational session.
///
/// Cheap to clone; clones share the same session. All operations take `&self`.
/// State sits behind a mutex that is released before every await, so the
/// `awaiting_reply` phase is what keeps requests one at a time.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

impl SessionController {
    /// Create a session with a fresh greeting as its only message
    pub fn new(
        gateway: CompletionGateway,
        credential: Option<Credential>,
        defaults: &SessionDefaults,
    ) -> Self {
        let state = SessionState {
            phase: SessionPhase::Idle,
            log: vec![Message::assistant(defaults.greeting.as_str())],
            input: String::new(),
            config: defaults.session_config(),
            knowledge: None,
            generation: 0,
        };
        let (snapshot_tx, _) = watch::channel(state.snapshot());
        let id = uuid::Uuid::new_v4().to_string();

        info!(
            session_id = %id,
            provider = gateway.provider_id(),
            model = gateway.model(),
            has_credential = credential.is_some(),
            "Session created"
        );

        Self {
            inner: Arc::new(ControllerInner {
                id,
                state: Mutex::new(state),
                gateway,
                credential,
                greeting: defaults.greeting.clone(),
                knowledge_extension: defaults.knowledge_extension.clone(),
                snapshot_tx,
            }),
        }
    }

    /// Build the HTTP gateway and resolve the credential once
    pub fn from_config(config: &ChatmarkConfig) -> SessionResult<Self> {
        let gateway = CompletionGateway::from_config(&config.gateway)?;
        let credential = config.gateway.resolve_credential();
        Ok(Self::new(gateway, credential, &config.session))
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    // ========== Input ==========

    pub fn set_input(&self, text: impl Into<String>) {
        self.inner.state.lock().input = text.into();
    }

    pub fn input(&self) -> String {
        self.inner.state.lock().input.clone()
    }

    /// Submit the pending input
    pub async fn send(&self) -> SessionResult<Message> {
        self.dispatch(None).await
    }

    /// Submit `text` directly. Resolves to the appended assistant message.
    pub async fn submit(&self, text: impl Into<String>) -> SessionResult<Message> {
        self.dispatch(Some(text.into())).await
    }

    async fn dispatch(&self, text: Option<String>) -> SessionResult<Message> {
        let inner = &self.inner;

        // validate and transition under the lock, never held across the await
        let (prompt, generation, config, snapshot) = {
            let mut state = inner.state.lock();
            let text = text.unwrap_or_else(|| state.input.clone());

            if text.trim().is_empty() {
                return Err(SessionError::EmptyInput);
            }
            if state.phase == SessionPhase::AwaitingReply {
                return Err(SessionError::RequestInFlight);
            }

            state.log.push(Message::user(text));
            state.input.clear();
            state.phase = SessionPhase::AwaitingReply;

            let prompt = compose(&state.config, state.knowledge.as_ref(), &state.log);
            let snapshot = inner.publish(&state);
            (prompt, state.generation, state.config.clone(), snapshot)
        };

        let request_id = uuid::Uuid::new_v4().to_string();
        info!(
            session_id = %inner.id,
            request_id = %request_id,
            generation,
            turns = prompt.turns.len(),
            has_knowledge = snapshot.has_knowledge,
            "Submitted message"
        );
        debug!(
            session_id = %inner.id,
            system_len = prompt.system_text.len(),
            temperature = config.temperature,
            max_tokens = config.max_tokens,
            "Composed prompt"
        );

        // The reply lands even if the caller stops waiting
        let task_inner = Arc::clone(inner);
        let span = create_session_span(&inner.id, Some(request_id.as_str()));
        let handle = tokio::spawn(
            async move {
                let reply = task_inner
                    .gateway
                    .complete(
                        task_inner.credential.as_ref(),
                        &prompt.system_text,
                        &prompt.turns,
                        config.temperature,
                        config.max_tokens,
                    )
                    .await;
                task_inner.land_reply(reply, generation)
            }
            .instrument(span),
        );

        let message = match handle.await {
            Ok(message) => message,
            Err(e) => {
                warn!(session_id = %inner.id, "Completion task failed: {}", e);
                inner.land_reply(format!("{}{}", ERROR_PREFIX, e), generation)
            }
        };

        info!(session_id = %inner.id, reply_len = message.content.len(), "Reply received");
        Ok(message)
    }

    // ========== Knowledge ==========

    /// Replace the knowledge document. Allowed while a reply is pending; only
    /// later prompts see it.
    pub fn ingest_document(
        &self,
        name: impl Into<String>,
        contents: impl Into<String>,
    ) -> SessionResult<Message> {
        let name = name.into();
        self.check_extension(&name)?;

        let document = KnowledgeDocument::new(name, contents);
        let announcement = Message::assistant(document.announcement());

        info!(
            session_id = %self.inner.id,
            name = %document.name,
            bytes = document.contents.len(),
            "Knowledge document loaded"
        );

        let mut state = self.inner.state.lock();
        state.knowledge = Some(document);
        state.log.push(announcement.clone());
        self.inner.publish(&state);
        Ok(announcement)
    }

    /// Read a file and ingest it. The extension is checked before the read.
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> SessionResult<Message> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.check_extension(&name)?;

        let contents = tokio::fs::read_to_string(path).await?;
        self.ingest_document(name, contents)
    }

    fn check_extension(&self, name: &str) -> SessionResult<()> {
        if knowledge::is_supported(name, &self.inner.knowledge_extension) {
            Ok(())
        } else {
            info!(session_id = %self.inner.id, name, "Rejected document");
            Err(SessionError::unsupported_document(
                name,
                self.inner.knowledge_extension.as_str(),
            ))
        }
    }

    pub fn knowledge(&self) -> Option<KnowledgeDocument> {
        self.inner.state.lock().knowledge.clone()
    }

    pub fn has_knowledge(&self) -> bool {
        self.inner.state.lock().knowledge.is_some()
    }

    // ========== Config ==========

    pub fn update_config(&self, field: ConfigField, value: &str) -> SessionResult<()> {
        let update = ConfigUpdate::parse(field, value)?;
        self.apply_config(update);
        Ok(())
    }

    /// String-keyed form for UI glue; unknown names are rejected
    pub fn update_config_str(&self, name: &str, value: &str) -> SessionResult<()> {
        let field: ConfigField = name.parse()?;
        self.update_config(field, value)
    }

    pub fn apply_config(&self, update: ConfigUpdate) {
        debug!(session_id = %self.inner.id, field = %update.field(), "Config updated");
        self.inner.state.lock().config.apply(update);
    }

    pub fn config(&self) -> SessionConfig {
        self.inner.state.lock().config.clone()
    }

    // ========== Log ==========

    /// Replace the log with a fresh greeting. Config and knowledge are kept.
    /// A pending reply still lands afterwards.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        if state.phase == SessionPhase::AwaitingReply {
            warn!(session_id = %self.inner.id, "Reset while a reply is pending");
        }
        state.log = vec![Message::assistant(self.inner.greeting.as_str())];
        state.generation += 1;
        self.inner.publish(&state);
        info!(session_id = %self.inner.id, "Session reset");
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().log.clone()
    }

    /// Messages paired with their rendered markup, for display
    pub fn rendered_messages(&self) -> Vec<(Message, String)> {
        self.messages()
            .into_iter()
            .map(|message| {
                let html = chatmark_markup::render(&message.content);
                (message, html)
            })
            .collect()
    }

    /// Prompt the next submission would send, minus the new user message
    pub fn compose(&self) -> ComposedPrompt {
        let state = self.inner.state.lock();
        compose(&state.config, state.knowledge.as_ref(), &state.log)
    }

    // ========== Observation ==========

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.lock().phase
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.phase() == SessionPhase::AwaitingReply
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.inner.id)
            .field("gateway", &self.inner.gateway)
            .field("credential", &self.inner.credential)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatmark_core::types::Role;
    use chatmark_llm::{CompletionProvider, ADVISORY_REPLY};
    use chatmark_config::DEFAULT_GREETING;

    struct NeverCalled;

    #[async_trait::async_trait]
    impl CompletionProvider for NeverCalled {
        async fn chat(
            &self,
            _credential: &Credential,
            _request: chatmark_core::chat::ChatRequest,
        ) -> chatmark_llm::Result<chatmark_core::chat::ChatResponse> {
            panic!("no request expected without a credential")
        }
    }

    fn controller() -> SessionController {
        let gateway = CompletionGateway::new(Arc::new(NeverCalled), "m");
        SessionController::new(gateway, None, &SessionDefaults::default())
    }

    #[test]
    fn test_starts_with_greeting() {
        let session = controller();
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, DEFAULT_GREETING);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_send_uses_and_clears_pending_input() {
        let session = controller();
        session.set_input("hello");
        assert_eq!(session.input(), "hello");

        let reply = session.send().await.unwrap();
        assert_eq!(reply.content, ADVISORY_REPLY);
        assert_eq!(session.input(), "");
        assert_eq!(session.messages()[1].content, "hello");
    }

    #[tokio::test]
    async fn test_empty_pending_input_is_rejected() {
        let session = controller();
        session.set_input("   ");
        assert!(matches!(session.send().await, Err(SessionError::EmptyInput)));
        assert_eq!(session.input(), "   ");
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_user_text_is_kept_untrimmed() {
        let session = controller();
        session.submit("  spaced  ").await.unwrap();
        assert_eq!(session.messages()[1].content, "  spaced  ");
    }

    #[test]
    fn test_update_config_str() {
        let session = controller();
        session.update_config_str("temperature", "0.3").unwrap();
        session.update_config_str("system_prompt", "Be brief.").unwrap();
        assert_eq!(session.config().temperature, 0.3);
        assert_eq!(session.compose().system_text, "Be brief.");

        assert!(matches!(
            session.update_config_str("model", "gpt-4"),
            Err(SessionError::Config(_))
        ));
        assert!(matches!(
            session.update_config(ConfigField::MaxTokens, "many"),
            Err(SessionError::Config(_))
        ));
        assert_eq!(session.config().max_tokens, 800);
    }

    #[test]
    fn test_rendered_messages() {
        let session = controller();
        session.ingest_document("notes.md", "# Notes").unwrap();
        let rendered = session.rendered_messages();
        assert_eq!(rendered.len(), 2);
        assert_eq!(
            rendered[1].1,
            "📂 Uploaded markdown knowledge base: <strong>notes.md</strong>"
        );
    }

    #[test]
    fn test_snapshot_tracks_state() {
        let session = controller();
        let rx = session.subscribe();
        session.ingest_document("notes.md", "X").unwrap();
        let snapshot = *rx.borrow();
        assert_eq!(
            snapshot,
            SessionSnapshot {
                phase: SessionPhase::Idle,
                message_count: 2,
                has_knowledge: true,
            }
        );

        session.reset();
        assert_eq!(rx.borrow().message_count, 1);
        assert!(rx.borrow().has_knowledge);
    }
}
