use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::config::{ConfigError, ConfigResult};

/// Advisory temperature range; values outside are kept but logged
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Advisory max_tokens range; values outside are kept but logged
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 64..=2048;

/// Generation settings owned by a single session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        crate::config::SessionDefaults::default().session_config()
    }
}

/// Finite float; surrounding whitespace is ignored
pub(crate) fn parse_temperature(value: &str) -> ConfigResult<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| ConfigError::Validation(format!("Invalid temperature: {}", value)))
}

pub(crate) fn parse_max_tokens(value: &str) -> ConfigResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid max_tokens: {}", value)))
}

/// Recognised session config keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Temperature,
    MaxTokens,
    SystemPrompt,
}

impl ConfigField {
    pub const ALL: [ConfigField; 3] = [Self::Temperature, Self::MaxTokens, Self::SystemPrompt];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::MaxTokens => "max_tokens",
            Self::SystemPrompt => "system_prompt",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Temperature | Self::MaxTokens)
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConfigError::KeyNotFound(s.to_string()))
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed change to one [`SessionConfig`] field
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    Temperature(f32),
    MaxTokens(u32),
    SystemPrompt(String),
}

impl ConfigUpdate {
    /// Coerce a raw UI value for `field`: numeric fields parse, text is kept verbatim.
    pub fn parse(field: ConfigField, value: &str) -> ConfigResult<Self> {
        match field {
            ConfigField::Temperature => Ok(Self::Temperature(parse_temperature(value)?)),
            ConfigField::MaxTokens => Ok(Self::MaxTokens(parse_max_tokens(value)?)),
            ConfigField::SystemPrompt => Ok(Self::SystemPrompt(value.to_string())),
        }
    }

    pub fn field(&self) -> ConfigField {
        match self {
            Self::Temperature(_) => ConfigField::Temperature,
            Self::MaxTokens(_) => ConfigField::MaxTokens,
            Self::SystemPrompt(_) => ConfigField::SystemPrompt,
        }
    }

    /// True when a numeric value falls outside its advisory range
    pub fn is_out_of_range(&self) -> bool {
        match self {
            Self::Temperature(t) => !TEMPERATURE_RANGE.contains(t),
            Self::MaxTokens(m) => !MAX_TOKENS_RANGE.contains(m),
            Self::SystemPrompt(_) => false,
        }
    }
}

impl SessionConfig {
    /// Apply a typed update. Ranges are advisory only.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if update.is_out_of_range() {
            tracing::warn!("{} set outside its advisory range: {:?}", update.field(), update);
        }
        match update {
            ConfigUpdate::Temperature(t) => self.temperature = t,
            ConfigUpdate::MaxTokens(m) => self.max_tokens = m,
            ConfigUpdate::SystemPrompt(p) => self.system_prompt = p,
        }
    }

    /// String-keyed entry point; unknown keys are rejected, not merged.
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let field: ConfigField = key.parse()?;
        self.apply(ConfigUpdate::parse(field, value)?);
        Ok(())
    }

    pub fn get_value(&self, field: ConfigField) -> String {
        match field {
            ConfigField::Temperature => self.temperature.to_string(),
            ConfigField::MaxTokens => self.max_tokens.to_string(),
            ConfigField::SystemPrompt => self.system_prompt.clone(),
        }
    }
}
