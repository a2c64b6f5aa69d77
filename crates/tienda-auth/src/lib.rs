//! # tienda-auth
//!
//! JWT login support for the tienda server.
//!
//! A single configured user may log in with email/password and receives an
//! HS256 access token; protected routes require that token as a Bearer
//! header. This is deliberately minimal - there is no user directory, no
//! refresh tokens and no authorization policy.

mod config;
mod error;
mod middleware;
mod token;

pub use config::{AuthConfig, DefaultUser};
pub use error::AuthError;
pub use middleware::{AuthState, require_auth};
pub use token::{Claims, JwtService};
