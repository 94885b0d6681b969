//! Turns caller values into the flat byte sequence the digest engine reads.
//!
//! Text is hashed as its UTF-8 encoding. Binary buffers are borrowed as-is,
//! without copying; a buffer view only exposes its own window of the backing
//! buffer. Anything else is rejected, never stringified or coerced.

use std::borrow::Cow;
use std::ops::Deref;

use crate::error::{FingerprintError, Result};

/// A caller-supplied value, as recognized by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostValue<'a> {
    /// Text already held as UTF-8.
    Text(&'a str),
    /// Text held as UTF-16 code units.
    WideText(&'a [u16]),
    /// Fixed binary buffer.
    Buffer(&'a [u8]),
    /// Window of `len` bytes starting at `offset` in `backing`.
    View {
        backing: &'a [u8],
        offset: usize,
        len: usize,
    },
    /// Growable buffer, hashed as its current content.
    Growable(&'a [u8]),
    Number(f64),
    Boolean(bool),
    Null,
    /// Any other host object, by type name.
    Other(&'a str),
}

impl HostValue<'_> {
    /// Short name of the value's shape, used in error messages.
    pub fn shape(&self) -> &str {
        match self {
            HostValue::Text(_) | HostValue::WideText(_) => "text",
            HostValue::Buffer(_) => "buffer",
            HostValue::View { .. } => "buffer view",
            HostValue::Growable(_) => "growable buffer",
            HostValue::Number(_) => "number",
            HostValue::Boolean(_) => "boolean",
            HostValue::Null => "null",
            HostValue::Other(name) => *name,
        }
    }
}

impl<'a> From<&'a str> for HostValue<'a> {
    fn from(text: &'a str) -> Self {
        HostValue::Text(text)
    }
}

impl<'a> From<&'a String> for HostValue<'a> {
    fn from(text: &'a String) -> Self {
        HostValue::Text(text)
    }
}

impl<'a> From<&'a [u8]> for HostValue<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        HostValue::Buffer(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for HostValue<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        HostValue::Buffer(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for HostValue<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        HostValue::Growable(bytes)
    }
}

/// Bytes handed to the digest engine. Borrows caller memory when it can and
/// owns a transcoded buffer otherwise; either way it is dropped with the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSequence<'a>(Cow<'a, [u8]>);

impl<'a> ByteSequence<'a> {
    fn borrowed(bytes: &'a [u8]) -> Self {
        Self(Cow::Borrowed(bytes))
    }

    fn owned(bytes: Vec<u8>) -> Self {
        Self(Cow::Owned(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// True when the bytes are a view into caller memory.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.0, Cow::Borrowed(_))
    }
}

impl Deref for ByteSequence<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Normalize `value` into a byte sequence.
pub fn adapt(value: HostValue<'_>) -> Result<ByteSequence<'_>> {
    match value {
        HostValue::Text(text) => Ok(ByteSequence::borrowed(text.as_bytes())),
        // Unpaired surrogates become U+FFFD.
        HostValue::WideText(units) => Ok(ByteSequence::owned(
            String::from_utf16_lossy(units).into_bytes(),
        )),
        HostValue::Buffer(bytes) => Ok(ByteSequence::borrowed(bytes)),
        HostValue::View {
            backing,
            offset,
            len,
        } => offset
            .checked_add(len)
            .and_then(|end| backing.get(offset..end))
            .map(ByteSequence::borrowed)
            .ok_or_else(|| {
                FingerprintError::unsupported(format!(
                    "buffer view out of bounds (offset {offset}, length {len}, buffer of {} bytes)",
                    backing.len()
                ))
            }),
        HostValue::Growable(bytes) => Ok(ByteSequence::borrowed(bytes)),
        other => Err(FingerprintError::unsupported(other.shape())),
    }
}
