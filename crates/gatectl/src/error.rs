//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gatectl_config::ConfigError;
use gatectl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the device: {message}")]
    #[diagnostic(
        code(gatectl::connection_failed),
        help(
            "Check that the device is powered and reachable.\n\
             Set the address with --device or in your profile."
        )
    )]
    ConnectionFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(gatectl::timeout),
        help("Increase the timeout with --timeout or check the device's responsiveness.")
    )]
    Timeout { message: String },

    // ── Session / authentication ─────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(code(gatectl::not_logged_in), help("Run: gatectl login"))]
    NotLoggedIn,

    #[error("{message}")]
    #[diagnostic(
        code(gatectl::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Run: gatectl config set-password"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(gatectl::no_credentials),
        help(
            "Configure credentials with: gatectl config init\n\
             Or set GATECTL_USERNAME / GATECTL_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Session storage error: {message}")]
    #[diagnostic(
        code(gatectl::session_store),
        help("Point --state-file at a writable location, or delete the corrupt file.")
    )]
    SessionStore { message: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(gatectl::http_error))]
    Http { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(code(gatectl::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(gatectl::invalid_response),
        help("The device answered with an unexpected shape. Try: gatectl raw GET <path>")
    )]
    InvalidResponse { message: String },

    #[error("{message}")]
    #[diagnostic(code(gatectl::interrupted))]
    Interrupted { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gatectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gatectl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gatectl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(gatectl::no_config),
        help(
            "Create a profile with: gatectl config init\n\
             Or pass --device. Config expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(gatectl::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(gatectl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(gatectl::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(gatectl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::AuthFailed { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Http { status, .. } if matches!(status, 401 | 403) => exit_code::AUTH,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Replace a device-failure message with the text a view showed for it
    /// (e.g. `Failed to save settings: ...`). Other variants are unchanged.
    pub fn shown_as(self, shown: Option<&str>) -> Self {
        let Some(shown) = shown else {
            return self;
        };
        let message = shown.to_owned();
        match self {
            Self::ConnectionFailed { .. } => Self::ConnectionFailed { message },
            Self::Timeout { .. } => Self::Timeout { message },
            Self::Http { status, .. } => Self::Http { status, message },
            Self::Rejected { .. } => Self::Rejected { message },
            Self::InvalidResponse { .. } => Self::InvalidResponse { message },
            Self::Validation { field, .. } => Self::Validation {
                field,
                reason: message,
            },
            other => other,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if let Some(api) = err.api_error() {
            return match api.status {
                Some(status) => Self::Http {
                    status,
                    message: api.message,
                },
                None if api.is_timeout() => Self::Timeout {
                    message: api.message,
                },
                None if api.is_decode() => Self::InvalidResponse {
                    message: api.message,
                },
                None => Self::ConnectionFailed {
                    message: api.message,
                },
            };
        }

        match err {
            CoreError::LoginRejected { message } => Self::AuthFailed {
                message,
                profile: "current".into(),
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::NotLoggedIn => Self::NotLoggedIn,
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Store { message } => Self::SessionStore { message },
            other @ (CoreError::Busy { .. } | CoreError::Cancelled | CoreError::Api { .. }) => {
                Self::Interrupted {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_401_maps_to_auth_exit_code() {
        let err = CliError::from(CoreError::from(gatectl_api::Error::http(
            401,
            "Invalid credentials",
        )));
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn transport_failure_maps_to_connection() {
        let err = CliError::from(CoreError::Api {
            message: "error sending request".into(),
            status: None,
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn rejected_ack_maps_to_rejected() {
        let err = CliError::from(CoreError::Rejected {
            message: "busy".into(),
        });
        assert_eq!(err.exit_code(), exit_code::REJECTED);
        assert_eq!(err.to_string(), "busy");
    }
}
