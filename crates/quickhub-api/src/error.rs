use thiserror::Error;

/// Top-level error type for the `quickhub-api` crate.
///
/// Covers every failure mode of the hub's HTTP surface: configuration
/// resolution, transport, protocol-level rejections, and payload decoding.
/// `quickhub-core` maps these into engine-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Connection parameters could not be resolved (missing host,
    /// missing credentials, unreadable config source).
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Authentication ──────────────────────────────────────────────
    /// The hub rejected the Basic credentials (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Non-2xx status from the hub, with whatever body it sent.
    #[error("Hub API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Rejected before sending: the request itself was invalid
    /// (e.g. a QuickApp file name that fails hub naming rules).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
