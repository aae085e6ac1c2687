#![allow(dead_code)]

use async_trait::async_trait;
use chatmark_config::{Credential, SessionDefaults};
use chatmark_core::chat::{ChatRequest, ChatResponse};
use chatmark_llm::{CompletionGateway, CompletionProvider, LLMError};
use chatmark_session::SessionController;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// What a scripted provider does when called
pub enum Script {
    Reply(Option<String>),
    Fail(String),
}

/// Provider that follows a script and records every request.
/// With `gated`, each call waits for one `release()` before answering.
pub struct ScriptedProvider {
    script: Script,
    gate: Option<Notify>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn reply(text: &str) -> Arc<Self> {
        Self::build(Script::Reply(Some(text.to_string())), false)
    }

    pub fn empty() -> Arc<Self> {
        Self::build(Script::Reply(None), false)
    }

    pub fn network_error(message: &str) -> Arc<Self> {
        Self::build(Script::Fail(message.to_string()), false)
    }

    pub fn gated(text: &str) -> Arc<Self> {
        Self::build(Script::Reply(Some(text.to_string())), true)
    }

    fn build(script: Script, gated: bool) -> Arc<Self> {
        Arc::new(Self {
            script,
            gate: gated.then(Notify::new),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _credential: &Credential, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.script {
            Script::Reply(text) => Ok(ChatResponse::new("scripted-1", "scripted-model", text.clone())),
            Script::Fail(message) => Err(LLMError::Network(message.clone())),
        }
    }
}

pub fn credential() -> Credential {
    Credential::new("sk-test").unwrap()
}

pub fn session_with(provider: Arc<ScriptedProvider>, credential: Option<Credential>) -> SessionController {
    let gateway = CompletionGateway::new(provider, "gpt-3.5-turbo");
    SessionController::new(gateway, credential, &SessionDefaults::default())
}
