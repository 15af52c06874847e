//! Health-check probe
//!
//! A probe opens a fresh connection, sends one echo request and closes the
//! connection. It runs on its own thread so the caller can bound it by
//! wall-clock time; the outcome is reduced to a boolean.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError};

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::protocol::{encode_params, ColumnEncoding, ParameterMap};
use crate::transport::{Connector, RpcResponse, Transport};

/// Path of the echo call used as a probe
pub const PROBE_PATH: &str = "/rpc/echo";

/// Check whether `endpoint` answers within `timeout`
///
/// Any completed exchange counts as healthy, whatever its status or body.
/// Errors, timeouts and panics inside the probe count as unhealthy and are
/// never propagated. A probe that times out keeps running in the background
/// until its transport gives up; its result is discarded.
pub fn probe<C: Connector>(connector: &Arc<C>, endpoint: &Endpoint, timeout: Duration) -> bool {
    let (tx, rx) = channel::bounded(1);
    let worker_connector = Arc::clone(connector);
    let target = endpoint.clone();

    let spawned = thread::Builder::new()
        .name(format!("tycoon-probe-{}", endpoint))
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(ping(worker_connector.as_ref(), &target));
        });

    if let Err(e) = spawned {
        tracing::warn!("connect failed at {}: cannot spawn probe: {}", endpoint, e);
        return false;
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(response)) => {
            tracing::debug!(
                "probe response from {}: status {} ({} bytes)",
                endpoint,
                response.status,
                response.body.len()
            );
            true
        }
        Ok(Err(e)) => {
            tracing::warn!("connect failed at {}: {}", endpoint, e);
            false
        }
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!("connect failed at {}: timed out after {:?}", endpoint, timeout);
            false
        }
        Err(RecvTimeoutError::Disconnected) => {
            tracing::warn!("connect failed at {}: probe aborted", endpoint);
            false
        }
    }
}

fn ping<C: Connector>(connector: &C, endpoint: &Endpoint) -> Result<RpcResponse> {
    tracing::debug!("connect check {}", endpoint);

    let mut conn = connector.open(endpoint)?;
    let params = ParameterMap::new().with("0", "0");
    let body = encode_params(Some(&params), ColumnEncoding::Url);
    let result = conn.send(PROBE_PATH, body.as_bytes(), ColumnEncoding::Url);

    if let Err(e) = conn.close() {
        tracing::debug!("closing probe connection to {} failed: {}", endpoint, e);
    }

    result
}
