//! Endpoint selection
//!
//! Failover policy over an [`EndpointPool`]. Probing is injected, so the
//! policy (first healthy candidate wins) stays separate from how a
//! candidate is checked.

use super::{Endpoint, EndpointPool};
use crate::error::{Result, TycoonError};

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Endpoint to use for the next request
    pub endpoint: Endpoint,

    /// True when it differs from the endpoint that was active before
    /// selection; any connection cached for the old one must be dropped
    pub changed: bool,
}

/// Decides which endpoint is active
#[derive(Debug, Clone, Default)]
pub struct EndpointSelector {
    pool: EndpointPool,
}

impl EndpointSelector {
    pub fn new(pool: impl Into<EndpointPool>) -> Self {
        Self { pool: pool.into() }
    }

    /// Current candidate pool
    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }

    /// Replace the candidate pool
    pub fn set_pool(&mut self, pool: impl Into<EndpointPool>) {
        self.pool = pool.into();
    }

    /// Pick the endpoint for the next request
    ///
    /// With one candidate it is returned as-is. With several, candidates are
    /// probed in order; the first healthy one becomes the only member of the
    /// pool and later candidates are not probed. If none is healthy the pool
    /// is emptied. An empty pool fails with [`TycoonError::NoHealthyEndpoint`].
    pub fn select_active<F>(&mut self, mut probe: F) -> Result<Selection>
    where
        F: FnMut(&Endpoint) -> bool,
    {
        let previous = self.pool.active().cloned();

        if self.pool.len() > 1 {
            let healthy = self.pool.iter().find(|endpoint| probe(*endpoint)).cloned();
            match healthy {
                Some(endpoint) => self.pool.collapse_to(endpoint),
                None => self.pool.clear(),
            }
        }

        let endpoint = match self.pool.active() {
            Some(endpoint) => endpoint.clone(),
            None => {
                tracing::error!("alive server does not exist");
                return Err(TycoonError::NoHealthyEndpoint);
            }
        };

        Ok(Selection {
            changed: previous.as_ref() != Some(&endpoint),
            endpoint,
        })
    }
}
