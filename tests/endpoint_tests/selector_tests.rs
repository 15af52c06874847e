//! Endpoint Selection Tests
//!
//! Tests verify:
//! - Single-endpoint pools are used without probing
//! - First healthy candidate wins and the pool collapses
//! - Exhausted pools fail and stay empty
//! - Probes treat errors, timeouts and panics as unhealthy
//! - Endpoint parsing

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{endpoint, init_tracing, MockConnector, MockTransport};
use tycoon::endpoint::{probe, Endpoint, EndpointSelector, DEFAULT_PORT, PROBE_PATH};
use tycoon::{ColumnEncoding, Connector, TycoonError};

/// Connector whose `open` panics, like a transport with a bug
struct PanickingConnector;

impl Connector for PanickingConnector {
    type Connection = MockTransport;

    fn open(&self, endpoint: &Endpoint) -> tycoon::Result<MockTransport> {
        panic!("transport bug while connecting to {}", endpoint);
    }
}

// =============================================================================
// Selection Policy Tests
// =============================================================================

#[test]
fn test_single_endpoint_is_not_probed() {
    let mut selector = EndpointSelector::new(vec![endpoint(1)]);
    let mut probes = 0;

    let selection = selector
        .select_active(|_| {
            probes += 1;
            false
        })
        .unwrap();

    assert_eq!(probes, 0);
    assert_eq!(selection.endpoint, endpoint(1));
    assert!(!selection.changed);
}

#[test]
fn test_failover_picks_first_healthy_and_collapses() {
    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2), endpoint(3)]);
    let mut probed = Vec::new();

    let selection = selector
        .select_active(|candidate| {
            probed.push(candidate.clone());
            *candidate == endpoint(2)
        })
        .unwrap();

    assert_eq!(selection.endpoint, endpoint(2));
    assert!(selection.changed);
    assert_eq!(probed, vec![endpoint(1), endpoint(2)]);
    assert_eq!(selector.pool().as_slice(), &[endpoint(2)]);
}

#[test]
fn test_collapsed_pool_is_not_probed_again() {
    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2), endpoint(3)]);
    selector
        .select_active(|candidate| *candidate == endpoint(2))
        .unwrap();

    let mut probes = 0;
    let selection = selector
        .select_active(|_| {
            probes += 1;
            true
        })
        .unwrap();

    assert_eq!(probes, 0);
    assert_eq!(selection.endpoint, endpoint(2));
    assert!(!selection.changed);
}

#[test]
fn test_first_candidate_healthy_is_unchanged() {
    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2)]);

    let selection = selector.select_active(|_| true).unwrap();

    assert_eq!(selection.endpoint, endpoint(1));
    assert!(!selection.changed);
    assert_eq!(selector.pool().len(), 1);
}

#[test]
fn test_exhausted_pool_fails_and_stays_empty() {
    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2), endpoint(3)]);
    let mut probes = 0;

    let result = selector.select_active(|_| {
        probes += 1;
        false
    });

    assert!(matches!(result, Err(TycoonError::NoHealthyEndpoint)));
    assert_eq!(probes, 3);
    assert!(selector.pool().is_empty());

    // Nothing left to fail over to
    let again = selector.select_active(|_| true);
    assert!(matches!(again, Err(TycoonError::NoHealthyEndpoint)));
}

#[test]
fn test_empty_pool_fails() {
    let mut selector = EndpointSelector::new(Vec::<Endpoint>::new());
    assert!(matches!(
        selector.select_active(|_| true),
        Err(TycoonError::NoHealthyEndpoint)
    ));
}

#[test]
fn test_set_pool_restarts_selection() {
    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2)]);
    let _ = selector.select_active(|_| false);
    assert!(selector.pool().is_empty());

    selector.set_pool(vec![endpoint(3), endpoint(4)]);
    let selection = selector
        .select_active(|candidate| *candidate == endpoint(4))
        .unwrap();

    assert_eq!(selection.endpoint, endpoint(4));
    assert!(selection.changed);
}

// =============================================================================
// Probe Tests
// =============================================================================

#[test]
fn test_probe_reachable_endpoint() {
    init_tracing();
    let mock = MockConnector::new();
    let connector = Arc::new(mock.clone());

    assert!(probe(&connector, &endpoint(1), Duration::from_millis(500)));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, PROBE_PATH);
    assert_eq!(requests[0].encoding, ColumnEncoding::Url);
    assert_eq!(requests[0].body_str(), "0\t0");

    // Probe connections are closed after use
    assert_eq!(mock.closes(), vec![requests[0].connection_id]);
}

#[test]
fn test_probe_unreachable_endpoint() {
    init_tracing();
    let mock = MockConnector::new();
    mock.set_unreachable(&endpoint(1));
    let connector = Arc::new(mock.clone());

    assert!(!probe(&connector, &endpoint(1), Duration::from_millis(500)));
    assert!(mock.requests().is_empty());
}

#[test]
fn test_probe_timeout_is_unhealthy() {
    init_tracing();
    let mock = MockConnector::new();
    mock.set_slow(&endpoint(1), Duration::from_secs(2));
    let connector = Arc::new(mock);

    let started = Instant::now();
    let healthy = probe(&connector, &endpoint(1), Duration::from_millis(50));

    assert!(!healthy);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_timed_out_probe_finishes_in_background() {
    init_tracing();
    let mock = MockConnector::new();
    mock.set_slow(&endpoint(1), Duration::from_millis(200));
    let connector = Arc::new(mock.clone());

    assert!(!probe(&connector, &endpoint(1), Duration::from_millis(20)));
    assert!(mock.probed().is_empty());

    // The worker is not cancelled; it completes its exchange on its own
    thread::sleep(Duration::from_millis(800));
    assert_eq!(mock.probed(), vec![endpoint(1)]);
    assert_eq!(mock.closes().len(), 1);
}

#[test]
fn test_probe_panic_is_unhealthy() {
    init_tracing();
    let connector = Arc::new(PanickingConnector);

    let started = Instant::now();
    let healthy = probe(&connector, &endpoint(1), Duration::from_secs(5));

    assert!(!healthy);
    // The worker's sender drops on unwind, so the wait ends early
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_failover_with_real_probes() {
    init_tracing();
    let mock = MockConnector::new();
    mock.set_unreachable(&endpoint(1));
    mock.set_slow(&endpoint(2), Duration::from_secs(2));
    let connector = Arc::new(mock.clone());
    let timeout = Duration::from_millis(50);

    let mut selector = EndpointSelector::new(vec![endpoint(1), endpoint(2), endpoint(3), endpoint(4)]);
    let selection = selector
        .select_active(|candidate| probe(&connector, candidate, timeout))
        .unwrap();

    assert_eq!(selection.endpoint, endpoint(3));
    assert_eq!(selector.pool().as_slice(), &[endpoint(3)]);
    assert!(!mock.probed().contains(&endpoint(4)));
}

// =============================================================================
// Endpoint Parsing Tests
// =============================================================================

#[test]
fn test_parse_host_and_port() {
    let ep: Endpoint = "kv.example.com:1979".parse().unwrap();
    assert_eq!(ep.host(), "kv.example.com");
    assert_eq!(ep.port(), 1979);
    assert_eq!(ep.to_string(), "kv.example.com:1979");
}

#[test]
fn test_parse_bare_host_uses_default_port() {
    let ep: Endpoint = "localhost".parse().unwrap();
    assert_eq!(ep.port(), DEFAULT_PORT);
}

#[test]
fn test_parse_invalid_endpoints() {
    assert!(matches!("host:abc".parse::<Endpoint>(), Err(TycoonError::Config(_))));
    assert!(matches!("host:70000".parse::<Endpoint>(), Err(TycoonError::Config(_))));
    assert!(matches!(":1978".parse::<Endpoint>(), Err(TycoonError::Config(_))));
}

#[test]
fn test_default_endpoint() {
    let ep = Endpoint::default();
    assert_eq!(ep.to_string(), "0.0.0.0:1978");
}
