//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication settings.
///
/// Login is checked against a single configured user; there is no user
/// directory. The JWT secret signs HS256 tokens for product mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether Bearer authentication is enforced on protected routes.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// HS256 signing secret. Must be non-empty when auth is enabled.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// The single user allowed to log in.
    #[serde(default)]
    pub default_user: DefaultUser,
}

/// Credentials of the configured login user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn default_enabled() -> bool {
    true
}

fn default_token_ttl_secs() -> u64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
            default_user: DefaultUser::default(),
        }
    }
}

impl Default for DefaultUser {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.jwt_secret.is_empty() {
            return Err("auth.jwt_secret must be set when auth is enabled".into());
        }
        if self.token_ttl_secs == 0 {
            return Err("auth.token_ttl_secs must be > 0".into());
        }
        if self.default_user.email.is_empty() || self.default_user.password.is_empty() {
            return Err("auth.default_user email and password must be set when auth is enabled".into());
        }
        Ok(())
    }
}
