//! Shopper identity extractor.
//!
//! Every visitor is a shopper. The first request mints a random shopper id
//! and stores it in the session; later requests read it back.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use goodstock_core::ShopperId;

use crate::error::{AppError, set_sentry_user};
use crate::state::{AppState, SharedSession};

/// Session keys.
pub mod session_keys {
    /// Key for the shopper's id.
    pub const SHOPPER_ID: &str = "shopper_id";
}

/// The current shopper and their state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(shopper: Shopper) -> impl IntoResponse {
///     let session = shopper.session.lock().await;
///     session.cart().total_items().to_string()
/// }
/// ```
pub struct Shopper {
    pub id: ShopperId,
    pub session: SharedSession,
}

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = if let Some(id) = session.get::<ShopperId>(session_keys::SHOPPER_ID).await? {
            id
        } else {
            let id = ShopperId::parse(&Uuid::new_v4().to_string())?;
            session.insert(session_keys::SHOPPER_ID, &id).await?;
            tracing::debug!(shopper_id = %id, "New shopper");
            id
        };

        set_sentry_user(&id);
        let shopper_session = state.session(&id).await;
        Ok(Self {
            id,
            session: shopper_session,
        })
    }
}
