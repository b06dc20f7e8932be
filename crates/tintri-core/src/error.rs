//! Error types for Tintri API operations.
//!
//! The wire-level taxonomy has exactly two kinds: a *transport fault* (no
//! usable HTTP response was obtained) and an *API fault* (a response arrived
//! but its status code is not the one expected for that operation). The
//! remaining variants cover local failures around the exchange itself, such
//! as undecodable response bodies or rejected configuration.

use std::fmt;
use thiserror::Error;

/// Sentinel recorded in an [`ApiFault`] when the request carried no body.
pub const NO_PAYLOAD: &str = "No Payload";

/// Diagnostic record of an HTTP response with an unexpected status code.
///
/// Carries enough context to reproduce the failing call: status code,
/// request URL, the serialized request payload (or [`NO_PAYLOAD`]), and the
/// raw response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFault {
    /// HTTP status code of the response.
    pub status: u16,
    /// Full request URL, including any query string.
    pub url: String,
    /// String form of the request payload.
    pub payload: String,
    /// Raw response body.
    pub body: String,
}

impl ApiFault {
    /// Create a fault record for a response with an unexpected status.
    #[must_use]
    pub fn new(
        status: u16,
        url: impl Into<String>,
        payload: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status,
            url: url.into(),
            payload: payload.into(),
            body: body.into(),
        }
    }
}

impl fmt::Display for ApiFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected API response: status code={} url:{} payload:{} response:{}",
            self.status, self.url, self.payload, self.body
        )
    }
}

impl std::error::Error for ApiFault {}

/// Main error type for Tintri client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No usable HTTP response was obtained (connection refused, timeout,
    /// malformed exchange).
    #[error("transport error: {0}")]
    Transport(String),

    /// A well-formed HTTP response arrived with an unexpected status code.
    #[error(transparent)]
    Api(#[from] ApiFault),

    /// A response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Client configuration was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// The server does not satisfy an operation's compatibility requirement.
    #[error("unsupported server: {0}")]
    Unsupported(String),

    /// A named object was not found on the server.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Specialized result type for Tintri client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true for faults where no HTTP response was obtained.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true for faults raised from a received HTTP response.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Status code of the offending response, for API faults.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(fault) => Some(fault.status),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection error: {err}"))
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_fault_display_carries_diagnostics() {
        let fault = ApiFault::new(401, "https://vmstore/api/v310/vm", NO_PAYLOAD, "denied");
        let text = fault.to_string();
        assert!(text.contains("status code=401"));
        assert!(text.contains("url:https://vmstore/api/v310/vm"));
        assert!(text.contains("payload:No Payload"));
        assert!(text.contains("response:denied"));
    }

    #[test]
    fn fault_kind_helpers() {
        let transport = Error::Transport("connection refused".to_string());
        assert!(transport.is_transport());
        assert!(!transport.is_api());
        assert_eq!(transport.status(), None);

        let api = Error::from(ApiFault::new(403, "https://x/api", NO_PAYLOAD, ""));
        assert!(api.is_api());
        assert!(!api.is_transport());
        assert_eq!(api.status(), Some(403));
    }

    #[test]
    fn from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn error_display() {
        let err = Error::Unsupported("minor version 21 is below 31".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported server: minor version 21 is below 31"
        );
    }
}
