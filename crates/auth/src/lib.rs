//! Authentication middleware for SwapShop APIs
//!
//! Session tokens are issued elsewhere; this crate only verifies them and
//! turns the token subject into an explicit actor id for handlers. The
//! extractors work with any domain state implementing `FromRef<S>` for
//! `AuthConfig`.

mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;

pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
