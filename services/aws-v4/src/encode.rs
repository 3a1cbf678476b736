//! Percent-encoding as required by SigV4 canonicalization.
//!
//! Generic url encoders disagree with AWS on a few bytes (`+`, `*`, `~`,
//! space), so only these two helpers are used when building canonical
//! requests.

use percent_encoding::utf8_percent_encode;

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET};

/// Encode a path, keeping `/` separators intact.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string()
}

/// Encode a query argument name or value. `/` is escaped.
pub fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, &AWS_QUERY_ENCODE_SET).to_string()
}
