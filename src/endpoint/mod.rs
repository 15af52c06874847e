//! Endpoint Module
//!
//! Candidate servers and the failover policy that picks one of them.
//!
//! ## Responsibilities
//! - Hold the ordered pool of candidate endpoints
//! - Probe candidates with a bounded health check
//! - Collapse the pool to the first healthy candidate
//! - Report when the active endpoint changed so cached connections can be
//!   dropped
//!
//! ## Failover Policy
//! ```text
//!  pool = [A, B, C]          pool = [B]            pool = []
//!  probe A: fail      ──▶    (no probing,    or    NoHealthyEndpoint
//!  probe B: ok               B returned)
//!  (C never probed)
//! ```
//! A single-endpoint pool is returned without probing.

mod pool;
mod health;
mod selector;

pub use pool::{Endpoint, EndpointPool, DEFAULT_HOST, DEFAULT_PORT};
pub use health::{probe, PROBE_PATH};
pub use selector::{EndpointSelector, Selection};
