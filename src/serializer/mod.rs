//! Serializer Module
//!
//! Value codecs turn application values into the bytes stored on the
//! server and back. The client picks one through its type parameter.

mod bincode;
mod raw;

pub use self::bincode::BincodeCodec;
pub use self::raw::{RawCodec, Utf8Codec};

use crate::error::Result;

/// Converts application values to and from stored bytes
pub trait ValueCodec {
    /// Application-side value type
    type Value;

    /// Encode a value for storage
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>>;

    /// Decode stored bytes
    fn decode(&self, bytes: &[u8]) -> Result<Self::Value>;
}
