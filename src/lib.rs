//! # Tycoon
//!
//! A blocking client for key-value servers speaking TSV-RPC, with:
//! - Tab-separated request/response codec (URL or base64 columns)
//! - Failover across several candidate servers with bounded health checks
//! - A cached connection that follows the active server
//! - Pluggable transports and value codecs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    KeyValueClient                            │
//! │        (get/set/cas/bulk/match, value codec)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  RequestDispatcher                           │
//! │      (DB injection, status check, cached connection)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────────────┐
//!          │            │                    │
//!          ▼            ▼                    ▼
//!   ┌─────────────┐ ┌─────────────┐  ┌──────────────┐
//!   │  Protocol   │ │  Endpoint   │  │  Transport   │
//!   │   (codec)   │ │ (failover)  │  │ (caller's)   │
//!   └─────────────┘ └─────────────┘  └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod endpoint;
pub mod transport;
pub mod dispatcher;
pub mod serializer;
pub mod client;
pub mod registry;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TycoonError, Result};
pub use config::ClientConfig;
pub use client::{BulkRecords, KeyValueClient};
pub use dispatcher::RequestDispatcher;
pub use endpoint::{Endpoint, EndpointPool, EndpointSelector};
pub use protocol::{ColumnEncoding, ParameterMap, Record};
pub use registry::ClientRegistry;
pub use serializer::{BincodeCodec, RawCodec, Utf8Codec, ValueCodec};
pub use transport::{Connector, RpcResponse, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
