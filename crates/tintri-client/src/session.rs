//! Session token handling.

use std::fmt;

/// Name of the cookie carrying the server-issued session identifier.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Opaque server-issued session token.
///
/// Obtained from a successful login and presented as a cookie on every
/// subsequent call. The server-side session must be released with a logout
/// exactly once, on every exit path.
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the `Cookie` header value for this session.
    pub(crate) fn cookie(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.0)
    }
}

// The token is a credential; keep it out of debug logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(..)")
    }
}
