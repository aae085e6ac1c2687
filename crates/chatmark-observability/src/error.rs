/// Errors raised while setting up or adjusting logging
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ObservabilityError {
    /// Bad filter directive
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Subscriber could not be installed or reloaded
    #[error("Logging error: {message}")]
    Logging { message: String },
}

impl ObservabilityError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObservabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ObservabilityError::config("Invalid directive");
        assert!(matches!(err, ObservabilityError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: Invalid directive");
    }
}
