//! Configuration for the Tycoon client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::error::{Result, TycoonError};
use crate::protocol::ColumnEncoding;

/// Main configuration for a client instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Candidate servers, in failover order
    pub endpoints: Vec<Endpoint>,

    /// Upper bound on each health-check probe
    ///
    /// The caller stops waiting after this long, but a probe that timed out
    /// keeps its worker thread until the transport's own connect or read
    /// fails. Transports without an I/O timeout of their own can therefore
    /// accumulate one blocked thread per timed-out probe.
    pub connect_timeout: Duration,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Escaping applied to request fields
    pub column_encoding: ColumnEncoding,

    /// Logical database sent as the `DB` field on every request
    pub db: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![Endpoint::default()],
            connect_timeout: Duration::from_millis(500),
            column_encoding: ColumnEncoding::Base64,
            db: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Check the configuration before a client is built from it
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(TycoonError::Config("no endpoint configured".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(TycoonError::Config(
                "connect timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
///
/// The endpoint list starts empty; `build` falls back to the default
/// endpoint when none was added.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoints: Vec<Endpoint>,
    connect_timeout: Option<Duration>,
    column_encoding: Option<ColumnEncoding>,
    db: Option<String>,
}

impl ClientConfigBuilder {
    /// Append a candidate endpoint
    pub fn endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.endpoints.push(Endpoint::new(host, port));
        self
    }

    /// Append a candidate given as `host:port`
    pub fn server(mut self, addr: &str) -> Result<Self> {
        self.endpoints.push(addr.parse()?);
        Ok(self)
    }

    /// Replace all candidate endpoints
    pub fn endpoints(mut self, endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        self.endpoints = endpoints.into_iter().collect();
        self
    }

    /// Set the probe timeout (see [`ClientConfig::connect_timeout`])
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the request column encoding
    pub fn column_encoding(mut self, encoding: ColumnEncoding) -> Self {
        self.column_encoding = Some(encoding);
        self
    }

    /// Bind the client to a logical database
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            endpoints: if self.endpoints.is_empty() {
                defaults.endpoints
            } else {
                self.endpoints
            },
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            column_encoding: self.column_encoding.unwrap_or(defaults.column_encoding),
            db: self.db,
        }
    }
}
