use thiserror::Error;

const TIMEOUT_PREFIX: &str = "Request timed out";
const DECODE_PREFIX: &str = "Invalid response from";

/// The one error type produced by the device client.
///
/// Every failure mode (transport, non-2xx status, undecodable body) collapses
/// into a message string plus the HTTP status when one was received. Callers
/// distinguish failures by `status` at most; the message is what gets shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Error {
    /// HTTP status code, if the device answered at all.
    pub status: Option<u16>,
    /// Human-readable description.
    pub message: String,
}

impl Error {
    /// Build an error from a non-success HTTP response.
    ///
    /// Produces `HTTP error! Status: <code> - <detail>`.
    pub fn http(status: u16, detail: &str) -> Self {
        Self {
            status: Some(status),
            message: format!("HTTP error! Status: {status} - {detail}"),
        }
    }

    /// Wrap a lower-level transport failure, keeping its own message and
    /// the chain of causes beneath it.
    pub fn transport(err: &reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        if err.is_timeout() {
            message = format!("{TIMEOUT_PREFIX}: {message}");
        }
        Self {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }

    /// A 2xx response whose body could not be decoded into the expected shape.
    pub fn decode(path: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("{DECODE_PREFIX} {path}: {reason}"),
        }
    }

    /// A request path that could not be joined onto the base URL.
    pub fn invalid_url(path: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Invalid URL for {path}: {reason}"),
        }
    }

    /// Failure to set up the HTTP client (TLS material, builder errors).
    pub fn setup(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            message: reason.into(),
        }
    }

    /// Returns `true` if the request gave up waiting for the device.
    pub fn is_timeout(&self) -> bool {
        self.status.is_none() && self.message.starts_with(TIMEOUT_PREFIX)
    }

    /// Returns `true` if a 2xx body could not be decoded.
    pub fn is_decode(&self) -> bool {
        self.status.is_none() && self.message.starts_with(DECODE_PREFIX)
    }

    /// Returns `true` if the device rejected the request as unauthenticated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_format() {
        let err = Error::http(401, "Invalid credentials");
        assert_eq!(err.to_string(), "HTTP error! Status: 401 - Invalid credentials");
        assert_eq!(err.status, Some(401));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn decode_error_has_no_status() {
        let err = Error::decode("/api/status", "missing field `IMEI`");
        assert!(err.status.is_none());
        assert!(err.message.contains("/api/status"));
        assert!(err.is_decode());
        assert!(!err.is_timeout());
        assert!(!err.is_unauthorized());
    }
}
