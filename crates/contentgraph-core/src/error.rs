use thiserror::Error;

/// Core error types for content model operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid actor token: {0}")]
    InvalidRefToken(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}

impl CoreError {
    /// Create a new InvalidRefToken error
    pub fn invalid_ref_token(token: impl Into<String>) -> Self {
        Self::InvalidRefToken(token.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }

    /// Create a new UnknownLanguage error
    pub fn unknown_language(language: impl Into<String>) -> Self {
        Self::UnknownLanguage(language.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::invalid_ref_token("nocolon").to_string(),
            "Invalid actor token: nocolon"
        );
        assert_eq!(
            CoreError::unknown_language("xx").to_string(),
            "Unknown language: xx"
        );
    }
}
