//! Protocol codec
//!
//! Encoding of request bodies and decoding of response bodies.
//!
//! ## Contract
//! Requests are escaped with the configured [`ColumnEncoding`]. Responses
//! are always URL-unescaped: the server answers in URL-escaped TSV no matter
//! how the request was written. Never decode a response as base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{ColumnEncoding, ParameterMap, Record};

/// Bytes left as-is by URL escaping (space is handled separately)
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Prefix marking data records in bulk calls
pub const BULK_PREFIX: char = '_';

/// Field separator within a line
const FIELD_SEPARATOR: &str = "\t";

/// Line separator for request bodies
const REQUEST_LINE_SEPARATOR: &str = "\r\n";

// =============================================================================
// Encoding
// =============================================================================

/// Encode a parameter map into a request body
///
/// Fields with an absent value are skipped. Each remaining field becomes
/// `name<TAB>value`; lines are joined with CRLF and the body has no
/// trailing terminator. `None` or an empty map yields an empty body.
pub fn encode_params(params: Option<&ParameterMap>, encoding: ColumnEncoding) -> String {
    let params = match params {
        Some(p) => p,
        None => return String::new(),
    };

    let escape: fn(&[u8]) -> String = match encoding {
        ColumnEncoding::Url => escape_url,
        ColumnEncoding::Base64 => escape_base64,
    };

    params
        .iter()
        .filter_map(|(name, value)| {
            value.map(|v| format!("{}{}{}", escape(name.as_bytes()), FIELD_SEPARATOR, escape(v)))
        })
        .collect::<Vec<_>>()
        .join(REQUEST_LINE_SEPARATOR)
}

/// Percent-escape bytes as a URL query component
///
/// Alphanumerics and `_.-~` pass through, space becomes `+`, everything
/// else is `%XX` with upper-case hex.
pub fn escape_url(bytes: &[u8]) -> String {
    percent_encode(bytes, URL_COMPONENT)
        .to_string()
        .replace(' ', "+")
}

fn escape_base64(bytes: &[u8]) -> String {
    // The standard engine never wraps lines, so there is nothing to strip
    STANDARD.encode(bytes)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a response body into a record
///
/// Lines are split on `\n` (a trailing `\r` is dropped), each line on its
/// first tab. Both sides are URL-unescaped. A line without a tab yields an
/// absent value; blank lines are ignored. Invalid UTF-8 in a key is
/// replaced lossily (see [`Record`]).
pub fn decode_body(body: &[u8]) -> Record {
    let mut record = Record::new();

    for line in body.split(|&b| b == b'\n') {
        // Escaped fields never contain a raw CR, so it can only be a CRLF tail
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let (key, value) = match line.iter().position(|&b| b == b'\t') {
            Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
            None => (line, None),
        };

        let key = String::from_utf8_lossy(&unescape_url(key)).into_owned();
        record.insert(key, value.map(unescape_url));
    }

    record
}

/// Reverse [`escape_url`]: `+` becomes space, then `%XX` is decoded
///
/// Malformed escapes are kept verbatim.
pub fn unescape_url(bytes: &[u8]) -> Vec<u8> {
    let plus_decoded: Vec<u8> = bytes
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&plus_decoded).collect()
}

// =============================================================================
// Bulk Keys
// =============================================================================

/// Field name carrying application key `key` in a bulk call
pub fn bulk_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len() + 1);
    field.push(BULK_PREFIX);
    field.push_str(key);
    field
}

/// Split a bulk response field name
///
/// Returns the application key for data records, `None` for metadata.
pub fn split_bulk_field(field: &str) -> Option<&str> {
    field.strip_prefix(BULK_PREFIX)
}
