// ── Core error types ──
//
// Errors a front end shows to the operator. Device failures stay a single
// message (see `gatectl_api::Error`); the other variants are decisions
// made locally before or after talking to the device.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Device ───────────────────────────────────────────────────────
    /// Transport failure, non-2xx status, or undecodable body.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if the device answered).
        status: Option<u16>,
    },

    /// The device answered the login with `sts == false`.
    #[error("{message}")]
    LoginRejected { message: String },

    /// A "set" call was acknowledged with `sts == false`.
    #[error("{message}")]
    Rejected { message: String },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not logged in")]
    NotLoggedIn,

    // ── Views ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A request for this view is already in flight.
    #[error("{operation} already in progress")]
    Busy { operation: &'static str },

    /// The view was closed, or a later save superseded the request.
    #[error("Request cancelled")]
    Cancelled,

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Store { message: String },
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }

    /// HTTP status, when the device produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// The device-layer error this was built from, if any.
    pub fn api_error(&self) -> Option<gatectl_api::Error> {
        match self {
            Self::Api { message, status } => Some(gatectl_api::Error {
                status: *status,
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gatectl_api::Error> for CoreError {
    fn from(err: gatectl_api::Error) -> Self {
        Self::Api {
            message: err.message,
            status: err.status,
        }
    }
}
