//! JWT token issuance and validation.
//!
//! Tokens are HS256-signed with the configured shared secret. Claims carry
//! the subject (user id), the login email, and issued-at/expiry timestamps.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthError;

/// Claims embedded in an access token.
///
/// Never put the password (or anything else secret) in here: claims are
/// signed, not encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Login email of the subject.
    pub email: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// HS256 token service.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are secret material; never include them in debug output.
        f.debug_struct("JwtService").finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new service from the shared signing secret.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::configuration("jwt secret must not be empty"));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issues a token for the given user, valid for `ttl` from now.
    pub fn issue(
        &self,
        user_id: impl Into<String>,
        email: impl Into<String>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user_id.into(),
            email: email.into(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::encoding(e.to_string()))
    }

    /// Decodes and validates a token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Expired` for expired tokens and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
