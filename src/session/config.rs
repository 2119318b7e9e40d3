//! Session endpoint and timeout settings.

use std::{fmt, time::Duration};

use cli_defs::{AppConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_MS};

use crate::command::AttributeEscaping;

/// Runtime address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self { Self::new(DEFAULT_HOST, DEFAULT_PORT) }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Settings a [`Session`](super::Session) is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Runtime address.
    pub endpoint: Endpoint,
    /// Bound on establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Bound on each blocking read.
    pub read_timeout: Duration,
    /// Bound on each blocking write.
    pub write_timeout: Duration,
    /// Attribute escaping used when building requests.
    pub escaping: AttributeEscaping,
    /// Reject responses whose header declares more bytes than this.
    pub max_response_bytes: Option<u32>,
}

/// Socket timeouts of zero are rejected by the standard library.
const fn non_zero(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        Duration::from_millis(1)
    } else {
        timeout
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        let timeout = Duration::from_millis(DEFAULT_TIMEOUT_MS);
        Self {
            endpoint: Endpoint::default(),
            connect_timeout: timeout,
            read_timeout: timeout,
            write_timeout: timeout,
            escaping: AttributeEscaping::Verbatim,
            max_response_bytes: None,
        }
    }
}

impl SessionConfig {
    /// Default settings for the given endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            endpoint: Endpoint::new(host, port),
            ..Self::default()
        }
    }

    /// Use one timeout for connect, read and write.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        let timeout_nz = non_zero(timeout);
        self.connect_timeout = timeout_nz;
        self.read_timeout = timeout_nz;
        self.write_timeout = timeout_nz;
        self
    }

    /// Override the read timeout only.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = non_zero(timeout);
        self
    }

    /// Select attribute escaping.
    #[must_use]
    pub const fn with_escaping(mut self, escaping: AttributeEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Limit accepted response size.
    #[must_use]
    pub const fn with_max_response_bytes(mut self, max: Option<u32>) -> Self {
        self.max_response_bytes = max;
        self
    }
}

impl From<&AppConfig> for SessionConfig {
    fn from(cfg: &AppConfig) -> Self {
        let escaping = if cfg.escape_attributes {
            AttributeEscaping::Escape
        } else {
            AttributeEscaping::Verbatim
        };
        let max = (cfg.max_response_bytes > 0).then_some(cfg.max_response_bytes);
        Self::new(cfg.host.clone(), cfg.port)
            .with_timeout(Duration::from_millis(cfg.timeout_ms))
            .with_escaping(escaping)
            .with_max_response_bytes(max)
    }
}
