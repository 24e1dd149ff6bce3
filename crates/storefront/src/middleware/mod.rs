//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions backed by the shopper state store)
//! 4. `Shopper` extractor (per-handler, resolves the shopper's state)

pub mod session;
pub mod shopper;

pub use session::{KvSessionStore, SESSION_COOKIE_NAME, create_session_layer};
pub use shopper::Shopper;
