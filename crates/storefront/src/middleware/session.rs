//! Session middleware configuration and the browser identity extractor.
//!
//! The session only carries the browser's [`BrowserId`]; the cart itself is
//! held by the cart registry and persisted in the browser's slot.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::cart::BrowserId;
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dw_session";

/// Session key holding the browser identity.
pub const BROWSER_ID_KEY: &str = "browser_id";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-process store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor for the requesting browser's identity.
///
/// A browser seen for the first time is issued a fresh id, which the session
/// layer then sends back as a cookie.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>, CurrentBrowser(browser): CurrentBrowser) {
///     let cart = state.carts().cart(browser).await;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentBrowser(pub BrowserId);

impl<S> FromRequestParts<S> for CurrentBrowser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        if let Some(browser) = session.get::<BrowserId>(BROWSER_ID_KEY).await? {
            return Ok(Self(browser));
        }

        let browser = BrowserId::generate();
        session.insert(BROWSER_ID_KEY, browser).await?;
        tracing::debug!(%browser, "issued browser id");
        Ok(Self(browser))
    }
}
