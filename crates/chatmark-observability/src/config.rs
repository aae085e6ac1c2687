//! Logging options

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Subscriber options, a superset of the config file's `logging` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `chatmark_session=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,

    /// Per-module overrides, added on top of `level`
    #[serde(default)]
    pub module_levels: HashMap<String, String>,

    #[serde(default = "default_true")]
    pub include_target: bool,

    #[serde(default)]
    pub include_thread_id: bool,

    #[serde(default)]
    pub include_line_number: bool,

    #[serde(default = "default_true")]
    pub ansi_colors: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            module_levels: HashMap::new(),
            include_target: true,
            include_thread_id: false,
            include_line_number: false,
            ansi_colors: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_json_format(mut self, json: bool) -> Self {
        self.json_format = json;
        if json {
            self.ansi_colors = false;
        }
        self
    }

    /// Add a module-specific level
    pub fn with_module_level(mut self, module: impl Into<String>, level: impl Into<String>) -> Self {
        self.module_levels.insert(module.into(), level.into());
        self
    }
}

impl From<&chatmark_config::LoggingConfig> for LoggingConfig {
    fn from(config: &chatmark_config::LoggingConfig) -> Self {
        LoggingConfig::default()
            .with_level(config.level.as_str())
            .with_json_format(config.json_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_section() {
        let file_section = chatmark_config::LoggingConfig {
            level: "debug".to_string(),
            json_format: true,
        };
        let config = LoggingConfig::from(&file_section);
        assert_eq!(config.level, "debug");
        assert!(config.json_format);
        assert!(!config.ansi_colors);
    }

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.include_target);
        assert!(config.module_levels.is_empty());
    }
}
