//! Error types for authentication operations.

/// Errors that can occur during login or token validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied email/password pair does not match the configured user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token is malformed or its signature does not verify.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },

    /// The authentication configuration is unusable.
    #[error("Auth configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error should surface as 401 Unauthorized.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::Expired | Self::InvalidToken { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::invalid_token(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(AuthError::InvalidCredentials.is_unauthorized());
        assert!(AuthError::Expired.is_unauthorized());
        assert!(AuthError::invalid_token("garbage").is_unauthorized());
        assert!(!AuthError::configuration("no secret").is_unauthorized());
        assert!(!AuthError::encoding("boom").is_unauthorized());
    }
}
