//! Transport Module
//!
//! The seam between the client and whatever carries bytes to the server.
//!
//! The client does not ship a socket or HTTP implementation. Callers supply
//! a [`Connector`] that opens one [`Transport`] per endpoint; the dispatcher
//! caches that transport until the active endpoint changes.

use bytes::Bytes;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::protocol::{decode_body, ColumnEncoding, Record, STATUS_LOGICAL_MISS, STATUS_OK};

/// One connection bound to one endpoint
pub trait Transport {
    /// Perform a single request/response exchange
    ///
    /// `body` is already encoded with `encoding`; the transport only has to
    /// advertise the encoding tag to the server. Connection failures must
    /// surface as errors.
    fn send(&mut self, path: &str, body: &[u8], encoding: ColumnEncoding) -> Result<RpcResponse>;

    /// Release the connection
    fn close(&mut self) -> Result<()>;
}

/// Opens transports to endpoints
///
/// Shared with health-check probe threads, hence `Send + Sync + 'static`.
pub trait Connector: Send + Sync + 'static {
    type Connection: Transport;

    /// Open a connection to `endpoint`
    fn open(&self, endpoint: &Endpoint) -> Result<Self::Connection>;
}

/// Raw outcome of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    /// Numeric status code
    pub status: u16,

    /// Undecoded response body
    pub body: Bytes,
}

impl RpcResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status 200
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Status 450
    pub fn is_logical_miss(&self) -> bool {
        self.status == STATUS_LOGICAL_MISS
    }

    /// Decode the body as a TSV record
    pub fn record(&self) -> Record {
        decode_body(&self.body)
    }
}
