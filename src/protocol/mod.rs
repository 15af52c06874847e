//! Protocol Module
//!
//! TSV-RPC wire format shared by every request and response.
//!
//! ## Body Format
//! ```text
//! name<TAB>value\r\n
//! name<TAB>value\r\n
//! name<TAB>value          (no trailing terminator)
//! ```
//!
//! ### Column Encodings (requests)
//! - `U`: names and values percent-escaped as URL query components
//! - `B`: names and values base64-encoded (standard alphabet, padded)
//!
//! ### Responses
//! Lines are separated by `\n` and always URL-escaped, whichever encoding
//! the request used. Decoding never looks at the request encoding.
//!
//! ### Status Codes
//! - 200: OK
//! - 450: logical miss (missing key, CAS mismatch); not an error
//! - anything else: remote error, body carries the detail
//!
//! ### Bulk Keys
//! Data records in bulk calls are named `_<key>`; any other name in a bulk
//! response (`num`, ...) is protocol metadata.

mod encoding;
mod params;
mod record;
mod codec;

pub use encoding::ColumnEncoding;
pub use params::ParameterMap;
pub use record::Record;
pub use codec::{
    bulk_field, decode_body, encode_params, escape_url, split_bulk_field, unescape_url,
    BULK_PREFIX,
};

/// Status code of a successful call
pub const STATUS_OK: u16 = 200;

/// Status code of a well-defined logical miss
pub const STATUS_LOGICAL_MISS: u16 = 450;

/// Reserved field selecting the logical database
pub const DB_FIELD: &str = "DB";

/// Reserved metadata field carrying counts and numeric results
pub const NUM_FIELD: &str = "num";
