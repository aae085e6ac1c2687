//! # Chatmark Session
//!
//! One conversation with a markdown knowledge chatbot:
//!
//! - **Prompt composition**: system prompt plus knowledge document, then the log as turns
//! - **Knowledge ingestion**: replace the active `.md` document, announced in the log
//! - **Session controller**: `idle`/`awaiting_reply` state machine with at most one
//!   completion request in flight
//!
//! ```rust,no_run
//! use chatmark_config::ChatmarkConfig;
//! use chatmark_session::SessionController;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionController::from_config(&ChatmarkConfig::default())?;
//!     session.ingest_document("notes.md", "# Deploys happen on Tuesdays")?;
//!     let reply = session.submit("When do deploys happen?").await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

pub mod compose;
pub mod controller;
pub mod error;
pub mod knowledge;

pub use compose::{compose, ComposedPrompt, KNOWLEDGE_HEADER};
pub use controller::{SessionController, SessionPhase, SessionSnapshot};
pub use error::{SessionError, SessionResult};
pub use knowledge::KnowledgeDocument;
