//! End-to-end test harness for the agency storefront.
//!
//! Each [`TestContext`] starts the full application on an ephemeral port and
//! drives it with a `reqwest` client that keeps cookies, so one context
//! behaves like one browser visiting the site.
//!
//! ```bash
//! cargo test -p agency-integration-tests
//! ```

use std::net::SocketAddr;

use agency_storefront::config::{ConfigError, StorefrontConfig};
use agency_storefront::routes;
use agency_storefront::state::AppState;
use serde_json::Value;
use thiserror::Error;

/// A running storefront plus a cookie-keeping client.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

/// Errors starting the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
    #[error("client: {0}")]
    Client(#[from] reqwest::Error),
}

impl TestContext {
    /// Start a storefront on `127.0.0.1:0` and a fresh visitor client.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError` if the listener or client cannot be created.
    pub async fn start() -> Result<Self, HarnessError> {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig::from_lookup(|key| match key {
            "AGENCY_BASE_URL" => Some(base_url.clone()),
            _ => None,
        })?;
        let app = routes::app(AppState::new(config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a JSON request and return the status and parsed body.
    ///
    /// A body that is empty or not JSON comes back as `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure.
    pub async fn json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(reqwest::StatusCode, Value), reqwest::Error> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, value))
    }
}
