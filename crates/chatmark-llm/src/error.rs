use thiserror::Error;

/// Unified error type for completion calls
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("transform error: {0}")]
    Transform(#[from] ConversionError),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LLMError::Timeout(e.to_string())
        } else {
            LLMError::Network(e.to_string())
        }
    }
}

impl LLMError {
    /// Failure text shown to the user, without the category label
    pub fn user_message(&self) -> String {
        match self {
            LLMError::Network(message) | LLMError::Timeout(message) | LLMError::Config(message) => {
                message.clone()
            }
            LLMError::Api { status, message } => format!("{} - {}", status, message),
            LLMError::Transform(e) => e.to_string(),
        }
    }
}

/// Error while converting to or from the wire schema
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status_and_body() {
        let err = LLMError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert_eq!(err.to_string(), "api error: 401 - invalid api key");
    }

    #[test]
    fn test_user_message_drops_category() {
        let network = LLMError::Network("connection reset".to_string());
        assert_eq!(network.user_message(), "connection reset");
        assert_eq!(LLMError::Timeout("deadline".to_string()).user_message(), "deadline");
        let api = LLMError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(api.user_message(), "429 - slow down");
    }

    #[test]
    fn test_json_error_converts_to_transform() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: LLMError = ConversionError::from(json_err).into();
        assert!(matches!(err, LLMError::Transform(ConversionError::Json(_))));
    }
}
