//! Utility functions and types.

use std::fmt::{Debug, Formatter};

/// Values shorter than this are fully masked.
const REDACT_MIN_CHARS: usize = 12;
/// Characters kept visible at each end of a long value.
const REDACT_VISIBLE_CHARS: usize = 3;

/// Masks a secret in `Debug` output.
///
/// Access key ids and secret keys are long enough to keep three characters
/// at both ends, which tells credentials apart in logs without leaking them.
/// Anything shorter than twelve characters prints as `***`, an empty value
/// prints as `EMPTY`. Lengths count characters, not bytes.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chars = self.0.chars().count();
        if chars == 0 {
            return f.write_str("EMPTY");
        }
        if chars < REDACT_MIN_CHARS {
            return f.write_str("***");
        }

        let head: String = self.0.chars().take(REDACT_VISIBLE_CHARS).collect();
        let tail: String = self
            .0
            .chars()
            .skip(chars - REDACT_VISIBLE_CHARS)
            .collect();
        write!(f, "{head}***{tail}")
    }
}
