//! Size limits on values a program builds.
//!
//! Every path that creates a longer array or string checks these before
//! allocating, so a doubling loop ends in a `RangeError` instead of
//! exhausting the host's memory.

use crate::errors::{self, EvalError};

/// Longest array a program may build.
pub const MAX_ARRAY_LENGTH: usize = 1 << 22;

/// Longest string a program may build, in UTF-8 bytes.
pub const MAX_STRING_LENGTH: usize = 1 << 24;

/// `RangeError: Invalid array length` past [`MAX_ARRAY_LENGTH`].
#[inline]
pub fn check_array_length(len: usize) -> Result<(), EvalError> {
    if len > MAX_ARRAY_LENGTH {
        Err(errors::invalid_array_length())
    } else {
        Ok(())
    }
}

/// `RangeError: Invalid string length` past [`MAX_STRING_LENGTH`].
#[inline]
pub fn check_string_length(len: usize) -> Result<(), EvalError> {
    if len > MAX_STRING_LENGTH {
        Err(errors::invalid_string_length())
    } else {
        Ok(())
    }
}

/// Append `text` to a string under construction.
#[inline]
pub fn push_bounded(out: &mut String, text: &str) -> Result<(), EvalError> {
    check_string_length(out.len().saturating_add(text.len()))?;
    out.push_str(text);
    Ok(())
}
