// Hub HTTP client
//
// Wraps `reqwest::Client` with hub-specific URL construction, per-request
// Basic auth, and status/body decoding. Endpoint groups (devices, events,
// files) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::provider::{ConfigProvider, ConnectionInfo};
use crate::transport::TransportConfig;

/// Raw HTTP client for the hub's REST API.
///
/// Connection parameters (scheme, host, credentials) are resolved from the
/// [`ConfigProvider`] on every request, so rotation takes effect without
/// rebuilding the client. All methods return decoded payloads; status
/// handling and auth mapping happen before the caller sees a body.
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::Client,
    provider: Arc<dyn ConfigProvider>,
}

impl HubClient {
    /// Create a new client from a provider and a `TransportConfig`.
    pub fn new(
        provider: Arc<dyn ConfigProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, provider })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, provider: Arc<dyn ConfigProvider>) -> Self {
        Self { http, provider }
    }

    /// Resolve the current connection parameters.
    pub fn connection(&self) -> Result<ConnectionInfo, Error> {
        self.provider.connection()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{scheme}://{host}/api/{path}`.
    ///
    /// `path` may carry a query string.
    pub(crate) fn api_url(conn: &ConnectionInfo, path: &str) -> Result<Url, Error> {
        let base = conn.base_url()?;
        Url::parse(&format!("{base}api/{path}")).map_err(Error::InvalidUrl)
    }

    /// The hub's built-in web UI page for a device:
    /// `{scheme}://{host}/mobile/devices/{id}`.
    pub fn device_ui_url(&self, id: u64) -> Result<Url, Error> {
        let conn = self.provider.connection()?;
        let base = conn.base_url()?;
        Url::parse(&format!("{base}mobile/devices/{id}")).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.request_text(Method::GET, path, None::<&()>, None).await?;
        Self::decode(&body)
    }

    /// Send a GET request with a per-request timeout override.
    ///
    /// Used by the long poll, whose client-side timeout must exceed the
    /// server's advertised wait window.
    pub(crate) async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, Error> {
        let body = self
            .request_text(Method::GET, path, None::<&()>, Some(timeout))
            .await?;
        Self::decode(&body)
    }

    /// Send a GET request and return the raw body text.
    ///
    /// Some hub endpoints (QuickApp file content) respond with either a
    /// JSON object or a bare string; callers decide how to interpret it.
    pub(crate) async fn get_text(&self, path: &str) -> Result<String, Error> {
        self.request_text(Method::GET, path, None::<&()>, None).await
    }

    /// Send a POST request with a JSON body, returning the status code.
    ///
    /// The hub's create endpoints signal success with 200..=203 and don't
    /// return a useful body, so only the status is surfaced.
    pub(crate) async fn post_status(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<StatusCode, Error> {
        self.request_status(Method::POST, path, Some(body)).await
    }

    /// Send a PUT request with a JSON body, returning the status code.
    pub(crate) async fn put_status(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<StatusCode, Error> {
        self.request_status(Method::PUT, path, Some(body)).await
    }

    /// Send a DELETE request, returning the status code.
    pub(crate) async fn delete_status(&self, path: &str) -> Result<StatusCode, Error> {
        self.request_status(Method::DELETE, path, None::<&()>).await
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Issue a request and return the body text after status handling.
    async fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        timeout: Option<Duration>,
    ) -> Result<String, Error> {
        let resp = self.send(method, path, body, timeout).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        Self::check_status(status, &text)?;
        Ok(text)
    }

    /// Issue a request and return the status, mapping auth failures only.
    ///
    /// Callers own the success-range policy (e.g. the create endpoint's
    /// 200..=203 window), so non-2xx is not an error here.
    async fn request_status(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<StatusCode, Error> {
        let resp = self.send(method, path, body, None).await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("hub rejected credentials (HTTP {})", status.as_u16()),
            });
        }
        Ok(status)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, Error> {
        use secrecy::ExposeSecret;

        let conn = self.provider.connection()?;
        let url = Self::api_url(&conn, path)?;
        debug!("{} {}", method, url);

        let mut req = self
            .http
            .request(method, url)
            .basic_auth(&conn.user, Some(conn.password.expose_secret()));
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        req.send().await.map_err(Error::Transport)
    }

    fn check_status(status: StatusCode, body: &str) -> Result<(), Error> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("hub rejected credentials (HTTP {})", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                } else {
                    body.to_owned()
                },
            });
        }
        Ok(())
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_owned(),
        })
    }
}
