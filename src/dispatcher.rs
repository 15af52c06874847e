//! Dispatcher Module
//!
//! Performs one logical RPC call end to end.
//!
//! ## Call Sequence
//! 1. Inject the `DB` field when bound to a logical database
//! 2. Select the active endpoint (probing when several are configured)
//! 3. Drop the cached connection if the endpoint changed
//! 4. Reuse or open the cached connection
//! 5. Encode, send, and check the status (200 and 450 are both results)
//!
//! ## Concurrency Model
//! One dispatcher serves one caller at a time (`&mut self`). Callers that
//! need parallelism use one dispatcher per thread.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::endpoint::{probe, Endpoint, EndpointPool, EndpointSelector};
use crate::error::{Result, TycoonError};
use crate::protocol::{
    encode_params, ColumnEncoding, ParameterMap, DB_FIELD, STATUS_LOGICAL_MISS, STATUS_OK,
};
use crate::transport::{Connector, RpcResponse, Transport};

/// Connection bound to the endpoint it was opened for
struct CachedConnection<T> {
    endpoint: Endpoint,
    transport: T,
}

/// Routes requests to the active endpoint
pub struct RequestDispatcher<C: Connector> {
    /// Opens connections, shared with probe threads
    connector: Arc<C>,

    /// Failover state
    selector: EndpointSelector,

    /// Connection to the active endpoint, opened lazily
    cached: Option<CachedConnection<C::Connection>>,

    /// Request column encoding
    encoding: ColumnEncoding,

    /// Bound on each health-check probe
    connect_timeout: Duration,

    /// Logical database injected into every request
    db: Option<String>,
}

impl<C: Connector> RequestDispatcher<C> {
    /// Create a dispatcher from a validated config
    pub fn new(config: ClientConfig, connector: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            connector: Arc::new(connector),
            selector: EndpointSelector::new(config.endpoints),
            cached: None,
            encoding: config.column_encoding,
            connect_timeout: config.connect_timeout,
            db: config.db,
        })
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Perform one RPC call
    ///
    /// Returns the response for status 200 and 450. Any other status fails
    /// with [`TycoonError::Remote`] carrying the body. Transport failures
    /// propagate and the cached connection is discarded.
    pub fn invoke(&mut self, path: &str, params: Option<ParameterMap>) -> Result<RpcResponse> {
        let params = match &self.db {
            Some(db) => {
                let mut params = params.unwrap_or_default();
                params.insert(DB_FIELD, db.as_bytes());
                Some(params)
            }
            None => params,
        };

        let endpoint = self.select_endpoint()?;
        let body = encode_params(params.as_ref(), self.encoding);
        let encoding = self.encoding;

        let conn = self.connection(&endpoint)?;
        let response = match conn.send(path, body.as_bytes(), encoding) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} failed on {}: {}", path, endpoint, e);
                self.discard_connection();
                return Err(e);
            }
        };

        if response.status != STATUS_OK && response.status != STATUS_LOGICAL_MISS {
            return Err(TycoonError::Remote {
                status: response.status,
                body: response.body.to_vec(),
            });
        }

        tracing::info!(
            "{}: {} with query parameters {:?}",
            path,
            response.status,
            params.as_ref().unwrap_or(&ParameterMap::new())
        );

        Ok(response)
    }

    /// Select an endpoint and open the connection eagerly
    pub fn start(&mut self) -> Result<()> {
        let endpoint = self.select_endpoint()?;
        self.connection(&endpoint)?;
        Ok(())
    }

    /// Close and discard the cached connection
    pub fn finish(&mut self) -> Result<()> {
        match self.cached.take() {
            Some(mut cached) => cached.transport.close(),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Endpoint Handling
    // =========================================================================

    /// Run failover and drop the cached connection if the endpoint moved
    fn select_endpoint(&mut self) -> Result<Endpoint> {
        let connector = &self.connector;
        let timeout = self.connect_timeout;
        let selection = self
            .selector
            .select_active(|candidate| probe(connector, candidate, timeout))?;

        let stale = self
            .cached
            .as_ref()
            .map_or(false, |cached| cached.endpoint != selection.endpoint);
        if selection.changed || stale {
            self.discard_connection();
        }

        Ok(selection.endpoint)
    }

    /// Cached connection for `endpoint`, opening one if needed
    fn connection(&mut self, endpoint: &Endpoint) -> Result<&mut C::Connection> {
        if self.cached.is_none() {
            let transport = self.connector.open(endpoint)?;
            tracing::debug!("opened connection to {}", endpoint);
            self.cached = Some(CachedConnection {
                endpoint: endpoint.clone(),
                transport,
            });
        }

        match self.cached.as_mut() {
            Some(cached) => Ok(&mut cached.transport),
            None => Err(TycoonError::Transport(format!(
                "no connection to {}",
                endpoint
            ))),
        }
    }

    fn discard_connection(&mut self) {
        if let Some(mut cached) = self.cached.take() {
            tracing::debug!("dropping connection to {}", cached.endpoint);
            if let Err(e) = cached.transport.close() {
                tracing::debug!("closing connection to {} failed: {}", cached.endpoint, e);
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Endpoint the cached connection is bound to, if one is open
    pub fn connected_endpoint(&self) -> Option<&Endpoint> {
        self.cached.as_ref().map(|cached| &cached.endpoint)
    }

    /// Currently active endpoint (head of the pool)
    pub fn active_endpoint(&self) -> Option<&Endpoint> {
        self.selector.pool().active()
    }

    /// Remaining candidate endpoints
    pub fn endpoints(&self) -> &[Endpoint] {
        self.selector.pool().as_slice()
    }

    /// Replace the candidate endpoints; the next call re-runs selection
    pub fn set_endpoints(&mut self, endpoints: Vec<Endpoint>) {
        self.selector.set_pool(EndpointPool::new(endpoints));
    }

    pub fn column_encoding(&self) -> ColumnEncoding {
        self.encoding
    }

    pub fn set_column_encoding(&mut self, encoding: ColumnEncoding) {
        self.encoding = encoding;
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    pub fn set_db(&mut self, db: Option<String>) {
        self.db = db;
    }

    /// Shared connector
    pub fn connector(&self) -> &Arc<C> {
        &self.connector
    }
}

impl<C: Connector> Drop for RequestDispatcher<C> {
    fn drop(&mut self) {
        self.discard_connection();
    }
}
