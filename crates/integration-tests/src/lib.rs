//! Integration tests for Driftwood.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p driftwood-integration-tests
//! ```
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`;
//! no listener or external services are needed. Each [`TestContext`] owns a
//! temporary data directory for cart slots and behaves like one browser: it
//! keeps the session cookie between requests.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_storefront_health() {
//!     let mut ctx = TestContext::new();
//!     let resp = ctx.get("/health").await;
//!     assert_eq!(resp.status, StatusCode::OK);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use driftwood_storefront::{
    cart::CartRegistry, catalog::Catalog, config::StorefrontConfig,
    middleware::SESSION_COOKIE_NAME, state::AppState,
};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt;

/// Largest response body the harness reads.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// One storefront instance plus one browser talking to it.
pub struct TestContext {
    app: Router,
    cookie: Option<String>,
    data_dir: PathBuf,
    _tmp: Option<TempDir>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_str(&self.body).unwrap()
    }

    /// The parsed `HX-Trigger` header, if present.
    pub fn hx_trigger(&self) -> Option<serde_json::Value> {
        self.headers
            .get("hx-trigger")
            .map(|value| serde_json::from_str(value.to_str().unwrap()).unwrap())
    }

    /// Messages of the toasts carried by `HX-Trigger`, oldest first.
    pub fn toasts(&self) -> Vec<String> {
        self.hx_trigger()
            .and_then(|events| events.get("toast").cloned())
            .and_then(|toasts| toasts.as_array().cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|toast| toast["message"].as_str().map(String::from))
            .collect()
    }
}

impl TestContext {
    /// A storefront over the bundled catalog with file-backed carts in a
    /// fresh temporary directory.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().to_path_buf();
        let config = StorefrontConfig {
            data_dir: data_dir.clone(),
            ..StorefrontConfig::default()
        };
        let state = AppState::new(
            config,
            Catalog::embedded().unwrap(),
            CartRegistry::file_backed(&data_dir, 100),
        );

        Self {
            app: driftwood_storefront::app(state),
            cookie: None,
            data_dir,
            _tmp: Some(tmp),
        }
    }

    /// A second browser against the same storefront, with no session yet.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
            data_dir: self.data_dir.clone(),
            _tmp: None,
        }
    }

    /// Directory holding the cart slots.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Whether this browser has been issued a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a form-encoded POST request.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        for value in headers.get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default();
            if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                self.cookie = Some(pair.to_string());
            }
        }

        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode form fields, percent-escaping everything but unreserved characters.
fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                char::from(b).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
