//! Structured logging on top of `tracing`.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing_subscriber::{
    layer::SubscriberExt,
    reload::{self, Handle},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{ObservabilityError, Result};

type ReloadHandle = Handle<EnvFilter, Registry>;

/// Owns the global subscriber's filter so the level can change at runtime
#[derive(Debug, Clone)]
pub struct LogManager {
    config: Arc<RwLock<LoggingConfig>>,
    reload_handle: ReloadHandle,
}

impl LogManager {
    /// Install the global subscriber. Fails if one is already set.
    pub fn init(config: LoggingConfig) -> Result<Self> {
        let filter = build_filter(&config)?;
        let (filter, reload_handle) = reload::Layer::new(filter);
        let registry = tracing_subscriber::registry().with(filter);

        let installed = if config.json_format {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(config.include_target)
                .with_thread_ids(config.include_thread_id)
                .with_line_number(config.include_line_number)
                .with_ansi(config.ansi_colors);
            registry.with(layer).try_init()
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(config.include_target)
                .with_thread_ids(config.include_thread_id)
                .with_line_number(config.include_line_number)
                .with_ansi(config.ansi_colors);
            registry.with(layer).try_init()
        };
        installed.map_err(|e| ObservabilityError::logging(e.to_string()))?;

        tracing::info!(
            target: "chatmark_observability",
            "Log manager initialized with level: {}",
            config.level
        );

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            reload_handle,
        })
    }

    /// Install from the config file's `logging` section
    pub fn init_from_config(config: &chatmark_config::ChatmarkConfig) -> Result<Self> {
        Self::init(LoggingConfig::from(&config.logging))
    }

    /// Swap the filter without reinstalling the subscriber
    pub fn update_level(&self, level: &str) -> Result<()> {
        let mut candidate = self.config.read().clone();
        candidate.level = level.to_string();
        let new_filter = build_filter(&candidate)?;

        self.reload_handle
            .modify(|filter| *filter = new_filter)
            .map_err(|e| ObservabilityError::logging(format!("Failed to update log level: {}", e)))?;

        *self.config.write() = candidate;

        tracing::info!(
            target: "chatmark_observability",
            "Log level updated to: {}",
            level
        );
        Ok(())
    }

    pub fn config(&self) -> LoggingConfig {
        self.config.read().clone()
    }
}

/// Level plus module overrides as one `EnvFilter`
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ObservabilityError::config(format!("Invalid log level: {}", e)))?;

    for (module, level) in &config.module_levels {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| ObservabilityError::config(format!("Invalid directive: {}", e)))?,
        );
    }

    Ok(filter)
}

pub fn create_session_span(session_id: &str, request_id: Option<&str>) -> tracing::Span {
    if let Some(req_id) = request_id {
        tracing::info_span!(
            "session",
            session_id = %session_id,
            request_id = %req_id,
        )
    } else {
        tracing::info_span!(
            "session",
            session_id = %session_id,
        )
    }
}
