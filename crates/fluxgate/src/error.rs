//! CLI error types with miette diagnostics.
//!
//! Maps `ApiError` / `CoreError` / `ConfigError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fluxgate_api::ApiError;
use fluxgate_core::CoreError;

/// Exit codes for process termination.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the panel: {message}")]
    #[diagnostic(
        code(fluxgate::connection_failed),
        help(
            "Check that the panel is running and accessible.\n\
             Try: fluxgate nodes list -v"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fluxgate::timeout),
        help("Increase timeout with --timeout or check panel responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(fluxgate::auth_failed),
        help(
            "Verify your API token.\n\
             Set it in the config file or via FLUXGATE_TOKEN."
        )
    )]
    AuthFailed { message: String },

    // ── Panel API ────────────────────────────────────────────────────

    #[error("Panel API error (HTTP {status}): {message}")]
    #[diagnostic(code(fluxgate::api_error))]
    Api { status: u16, message: String },

    #[error("Could not decode panel response: {message}")]
    #[diagnostic(
        code(fluxgate::decode_error),
        help("The panel may be running an incompatible version.")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fluxgate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(fluxgate::config),
        help("Create a config file or pass --panel and --token directly.")
    )]
    Config(#[from] fluxgate_config::ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fluxgate::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { message } => Self::AuthFailed { message },

            ApiError::Transport(e) => Self::ConnectionFailed {
                message: e.to_string(),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "panel".into(),
                reason: e.to_string(),
            },
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            ApiError::Api { status, message } => Self::Api { status, message },

            ApiError::Deserialization { message, .. } => Self::Decode { message },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidRange { from, to } => Self::Validation {
                field: "range".into(),
                reason: format!("start {from} is after end {to}"),
            },
        }
    }
}
