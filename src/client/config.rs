//! Transport configuration options.

use std::time::Duration;

/// Configuration for the reqwest-backed transport.
///
/// The client core has no settings of its own; everything here concerns the
/// HTTP session.
///
/// # Example
///
/// ```
/// use keenetic_rs::TransportConfig;
/// use std::time::Duration;
///
/// let config = TransportConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("sms-bridge/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Skip TLS certificate validation (self-signed router certificates)
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("keenetic-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Accept invalid TLS certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
