//! Chatmark observability.
//!
//! Installs the `tracing` subscriber used by every chatmark crate: an `EnvFilter`
//! behind a reload layer, plain or JSON output, and a span helper for session
//! requests. `log` records from `chatmark-llm` are bridged into the same output.

pub mod config;
pub mod error;
pub mod logging;

pub use config::LoggingConfig;
pub use error::{ObservabilityError, Result};
pub use logging::{build_filter, create_session_span, LogManager};

/// Common imports
pub mod prelude {
    pub use crate::{LogManager, LoggingConfig, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn, Span};
}
