//! CLI error types with miette diagnostics.
//!
//! Maps engine and API errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use quickhub_core::CoreError;

/// Exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(quickhub::config),
        help(
            "Set HC3_HOST, HC3_USER and HC3_PASSWORD, or run: quickhub config init"
        )
    )]
    Config { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the hub")]
    #[diagnostic(
        code(quickhub::connection_failed),
        help(
            "Check that the hub is online and HC3_HOST points at it.\n\
             Try: quickhub config show"
        )
    )]
    Connection {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(quickhub::auth_failed),
        help("Verify HC3_USER and HC3_PASSWORD against the hub's local account.")
    )]
    Auth,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Device {id} not found")]
    #[diagnostic(
        code(quickhub::not_found),
        help("Run: quickhub apps list to see available QuickApps")
    )]
    NotFound { id: u64 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(quickhub::validation))]
    Validation { field: String, reason: String },

    // ── Passthrough ──────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(quickhub::api))]
    Api(quickhub_api::Error),

    #[error(transparent)]
    #[diagnostic(code(quickhub::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::Auth => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Api(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Map an API error, attributing "not found" to a device id.
    pub fn from_api_for(id: u64, error: quickhub_api::Error) -> Self {
        if error.is_not_found() {
            return Self::NotFound { id };
        }
        Self::from(error)
    }
}

impl From<quickhub_api::Error> for CliError {
    fn from(error: quickhub_api::Error) -> Self {
        match error {
            quickhub_api::Error::Authentication { .. } => Self::Auth,
            quickhub_api::Error::Config(message) => Self::Config { message },
            quickhub_api::Error::Transport(_) => Self::Connection {
                source: Box::new(error),
            },
            other => Self::Api(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Api(api) => Self::from(api),
            CoreError::InvalidRecord => Self::Connection {
                source: Box::new(error),
            },
        }
    }
}
