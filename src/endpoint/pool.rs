//! Endpoints and the candidate pool

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TycoonError};

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 1978;

/// A server address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = TycoonError;

    /// Parse `host:port`, or a bare host with the default port
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    TycoonError::Config(format!("Invalid port in endpoint '{}'", s))
                })?;
                (host, port)
            }
            None => (s, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(TycoonError::Config(format!(
                "Missing host in endpoint '{}'",
                s
            )));
        }

        Ok(Endpoint::new(host, port))
    }
}

/// Ordered candidate endpoints
///
/// The first element is the active endpoint. After a successful failover
/// the pool holds exactly one endpoint; after a failed one it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// The currently active endpoint, if any
    pub fn active(&self) -> Option<&Endpoint> {
        self.endpoints.first()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn as_slice(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Keep only `endpoint`
    pub fn collapse_to(&mut self, endpoint: Endpoint) {
        self.endpoints.clear();
        self.endpoints.push(endpoint);
    }

    /// Drop every candidate
    pub fn clear(&mut self) {
        self.endpoints.clear();
    }
}

impl From<Vec<Endpoint>> for EndpointPool {
    fn from(endpoints: Vec<Endpoint>) -> Self {
        Self::new(endpoints)
    }
}
