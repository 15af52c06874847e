//! Shared test fixtures
//!
//! A scripted in-memory connector that records every connection and
//! request, and can make endpoints unreachable or slow.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use tycoon::endpoint::PROBE_PATH;
use tycoon::{ColumnEncoding, Connector, Endpoint, Result, RpcResponse, Transport, TycoonError};

// =============================================================================
// Helper Functions
// =============================================================================

/// Install a test subscriber once; respects RUST_LOG
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tycoon=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn endpoint(port: u16) -> Endpoint {
    Endpoint::new("10.0.0.1", port)
}

// =============================================================================
// Scripted Connector
// =============================================================================

/// A request seen by a mock transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub connection_id: usize,
    pub endpoint: Endpoint,
    pub path: String,
    pub body: Vec<u8>,
    pub encoding: ColumnEncoding,
}

impl RecordedRequest {
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct MockState {
    unreachable: HashSet<Endpoint>,
    slow: HashMap<Endpoint, Duration>,
    responses: VecDeque<RpcResponse>,
    failing_sends: usize,
    next_connection_id: usize,
    opens: Vec<(usize, Endpoint)>,
    closes: Vec<usize>,
    requests: Vec<RecordedRequest>,
}

/// Connector whose handle stays inspectable after being moved into a client
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse connections to `endpoint`
    pub fn set_unreachable(&self, endpoint: &Endpoint) {
        self.state.lock().unreachable.insert(endpoint.clone());
    }

    /// Accept connections to `endpoint` again
    pub fn set_reachable(&self, endpoint: &Endpoint) {
        self.state.lock().unreachable.remove(endpoint);
    }

    /// Make opening a connection to `endpoint` hang for `delay`
    pub fn set_slow(&self, endpoint: &Endpoint, delay: Duration) {
        self.state.lock().slow.insert(endpoint.clone(), delay);
    }

    /// Queue the answer to the next non-probe request
    pub fn respond(&self, status: u16, body: &str) {
        self.state
            .lock()
            .responses
            .push_back(RpcResponse::new(status, body.as_bytes().to_vec()));
    }

    /// Make the next non-probe send fail with an I/O error
    pub fn fail_next_send(&self) {
        self.state.lock().failing_sends += 1;
    }

    /// Every successful open, in order
    pub fn opens(&self) -> Vec<(usize, Endpoint)> {
        self.state.lock().opens.clone()
    }

    /// Ids of closed connections
    pub fn closes(&self) -> Vec<usize> {
        self.state.lock().closes.clone()
    }

    /// Every request, probes included
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests other than health-check probes
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path != PROBE_PATH)
            .collect()
    }

    /// Endpoints probed, in order
    pub fn probed(&self) -> Vec<Endpoint> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == PROBE_PATH)
            .map(|r| r.endpoint)
            .collect()
    }

    pub fn last_call(&self) -> RecordedRequest {
        self.calls().pop().expect("no request recorded")
    }
}

impl Connector for MockConnector {
    type Connection = MockTransport;

    fn open(&self, endpoint: &Endpoint) -> Result<MockTransport> {
        let delay = self.state.lock().slow.get(endpoint).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let mut state = self.state.lock();
        if state.unreachable.contains(endpoint) {
            return Err(TycoonError::Transport(format!(
                "connection refused: {}",
                endpoint
            )));
        }

        let id = state.next_connection_id;
        state.next_connection_id += 1;
        state.opens.push((id, endpoint.clone()));

        Ok(MockTransport {
            id,
            endpoint: endpoint.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockTransport {
    id: usize,
    endpoint: Endpoint,
    state: Arc<Mutex<MockState>>,
}

impl Transport for MockTransport {
    fn send(&mut self, path: &str, body: &[u8], encoding: ColumnEncoding) -> Result<RpcResponse> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest {
            connection_id: self.id,
            endpoint: self.endpoint.clone(),
            path: path.to_string(),
            body: body.to_vec(),
            encoding,
        });

        if path == PROBE_PATH {
            return Ok(RpcResponse::new(200, b"0\t0".to_vec()));
        }

        if state.failing_sends > 0 {
            state.failing_sends -= 1;
            return Err(TycoonError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }

        Ok(state
            .responses
            .pop_front()
            .unwrap_or_else(|| RpcResponse::new(200, Vec::new())))
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().closes.push(self.id);
        Ok(())
    }
}
