//! Column encodings
//!
//! How individual fields are escaped inside a request body.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TycoonError};

/// Escaping scheme applied to each field of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnEncoding {
    /// Percent-escaped URL query components (space becomes `+`)
    Url,

    /// Standard base64 with padding
    #[default]
    Base64,
}

impl ColumnEncoding {
    /// Single-letter tag used in the `colenc` content-type parameter
    pub fn tag(&self) -> char {
        match self {
            ColumnEncoding::Url => 'U',
            ColumnEncoding::Base64 => 'B',
        }
    }

    /// Parse a `colenc` tag or a spelled-out name
    ///
    /// Anything unknown is a configuration error.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "U" | "URL" => Ok(ColumnEncoding::Url),
            "B" | "BASE64" => Ok(ColumnEncoding::Base64),
            other => Err(TycoonError::Config(format!("Unknown colenc '{}'", other))),
        }
    }
}

impl FromStr for ColumnEncoding {
    type Err = TycoonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ColumnEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
