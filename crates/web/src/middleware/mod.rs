//! Session plumbing and auth extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth, RequireSeller};
pub use session::{create_session_layer, session_keys};
