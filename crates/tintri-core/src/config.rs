//! Configuration for Tintri clients.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

const fn default_tls_verify() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    60
}

/// HTTP client configuration.
///
/// The appliances these clients talk to commonly run self-signed
/// certificates; verification can therefore be switched off, but it is on by
/// default and turning it off must be an explicit caller decision.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Whether to verify TLS certificates.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds.
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tls_verify: default_tls_verify(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a field is out of range.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|err| Error::Config(format!("invalid client configuration: {err}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
