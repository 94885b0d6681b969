//! Callable surface: one routine parameterized by [`EntryPoint`], plus a named
//! wrapper per published entry point.
//!
//! Every call runs value -> [`adapt`] -> [`digest`] -> encoder. It either
//! returns a complete result or an error; nothing else is observable.

use crate::core::{digest, Digest, Width};
use crate::encode::{self, encode, Encoded, Encoding};
use crate::error::{FingerprintError, Result};
use crate::input::{adapt, HostValue};

/// A published (width, encoding) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Fingerprint32,
    Fingerprint32Hex,
    Fingerprint32Bytes,
    /// Exact only in hosts with arbitrary-precision integers.
    Fingerprint64,
    Fingerprint64Hex,
    Fingerprint64Bytes,
    /// Exact only in hosts with arbitrary-precision integers.
    Fingerprint128,
    Fingerprint128Hex,
    Fingerprint128Bytes,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 9] = [
        EntryPoint::Fingerprint32,
        EntryPoint::Fingerprint32Hex,
        EntryPoint::Fingerprint32Bytes,
        EntryPoint::Fingerprint64,
        EntryPoint::Fingerprint64Hex,
        EntryPoint::Fingerprint64Bytes,
        EntryPoint::Fingerprint128,
        EntryPoint::Fingerprint128Hex,
        EntryPoint::Fingerprint128Bytes,
    ];

    pub const fn new(width: Width, encoding: Encoding) -> Self {
        match (width, encoding) {
            (Width::W32, Encoding::Number) => EntryPoint::Fingerprint32,
            (Width::W32, Encoding::Hex) => EntryPoint::Fingerprint32Hex,
            (Width::W32, Encoding::Bytes) => EntryPoint::Fingerprint32Bytes,
            (Width::W64, Encoding::Number) => EntryPoint::Fingerprint64,
            (Width::W64, Encoding::Hex) => EntryPoint::Fingerprint64Hex,
            (Width::W64, Encoding::Bytes) => EntryPoint::Fingerprint64Bytes,
            (Width::W128, Encoding::Number) => EntryPoint::Fingerprint128,
            (Width::W128, Encoding::Hex) => EntryPoint::Fingerprint128Hex,
            (Width::W128, Encoding::Bytes) => EntryPoint::Fingerprint128Bytes,
        }
    }

    pub const fn width(self) -> Width {
        match self {
            EntryPoint::Fingerprint32
            | EntryPoint::Fingerprint32Hex
            | EntryPoint::Fingerprint32Bytes => Width::W32,
            EntryPoint::Fingerprint64
            | EntryPoint::Fingerprint64Hex
            | EntryPoint::Fingerprint64Bytes => Width::W64,
            EntryPoint::Fingerprint128
            | EntryPoint::Fingerprint128Hex
            | EntryPoint::Fingerprint128Bytes => Width::W128,
        }
    }

    pub const fn encoding(self) -> Encoding {
        match self {
            EntryPoint::Fingerprint32 | EntryPoint::Fingerprint64 | EntryPoint::Fingerprint128 => {
                Encoding::Number
            }
            EntryPoint::Fingerprint32Hex
            | EntryPoint::Fingerprint64Hex
            | EntryPoint::Fingerprint128Hex => Encoding::Hex,
            EntryPoint::Fingerprint32Bytes
            | EntryPoint::Fingerprint64Bytes
            | EntryPoint::Fingerprint128Bytes => Encoding::Bytes,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EntryPoint::Fingerprint32 => "fingerprint32",
            EntryPoint::Fingerprint32Hex => "fingerprint32_hex",
            EntryPoint::Fingerprint32Bytes => "fingerprint32_bytes",
            EntryPoint::Fingerprint64 => "fingerprint64",
            EntryPoint::Fingerprint64Hex => "fingerprint64_hex",
            EntryPoint::Fingerprint64Bytes => "fingerprint64_bytes",
            EntryPoint::Fingerprint128 => "fingerprint128",
            EntryPoint::Fingerprint128Hex => "fingerprint128_hex",
            EntryPoint::Fingerprint128Bytes => "fingerprint128_bytes",
        }
    }
}

/// Call `entry` with a host argument list. Only the first argument is used;
/// an empty list is [`FingerprintError::MissingArgument`].
pub fn invoke(entry: EntryPoint, args: &[HostValue<'_>]) -> Result<Encoded> {
    let value = args.first().copied().ok_or_else(|| {
        log::debug!("{}: called without arguments", entry.name());
        FingerprintError::MissingArgument
    })?;
    fingerprint(entry, value)
}

pub fn fingerprint(entry: EntryPoint, value: HostValue<'_>) -> Result<Encoded> {
    run(entry, value).map(|d| encode(d, entry.encoding()))
}

/// The raw digest of `value` at `width`, before encoding.
pub fn fingerprint_digest<'a>(width: Width, value: impl Into<HostValue<'a>>) -> Result<Digest> {
    run(EntryPoint::new(width, Encoding::Number), value.into())
}

fn run(entry: EntryPoint, value: HostValue<'_>) -> Result<Digest> {
    let bytes = adapt(value).inspect_err(|err| {
        log::debug!("{}: rejected input: {err}", entry.name());
    })?;
    let digest = digest(&bytes, entry.width());
    log::trace!("{}: {} bytes -> {:?}", entry.name(), bytes.len(), digest);
    Ok(digest)
}

// =========================================================
//   named entry points
// =========================================================
//
// Each wrapper's width matches the digest variant, so the integer casts in
// the number entry points are exact.

pub fn fingerprint32<'a>(value: impl Into<HostValue<'a>>) -> Result<u32> {
    run(EntryPoint::Fingerprint32, value.into()).map(|d| d.as_u128() as u32)
}

pub fn fingerprint32_hex<'a>(value: impl Into<HostValue<'a>>) -> Result<String> {
    run(EntryPoint::Fingerprint32Hex, value.into()).map(encode::to_hex)
}

pub fn fingerprint32_bytes<'a>(value: impl Into<HostValue<'a>>) -> Result<Vec<u8>> {
    run(EntryPoint::Fingerprint32Bytes, value.into()).map(encode::to_bytes)
}

/// Loses precision if the host converts the result to a double.
pub fn fingerprint64<'a>(value: impl Into<HostValue<'a>>) -> Result<u64> {
    run(EntryPoint::Fingerprint64, value.into()).map(|d| d.as_u128() as u64)
}

pub fn fingerprint64_hex<'a>(value: impl Into<HostValue<'a>>) -> Result<String> {
    run(EntryPoint::Fingerprint64Hex, value.into()).map(encode::to_hex)
}

pub fn fingerprint64_bytes<'a>(value: impl Into<HostValue<'a>>) -> Result<Vec<u8>> {
    run(EntryPoint::Fingerprint64Bytes, value.into()).map(encode::to_bytes)
}

/// Loses precision if the host converts the result to a double.
pub fn fingerprint128<'a>(value: impl Into<HostValue<'a>>) -> Result<u128> {
    run(EntryPoint::Fingerprint128, value.into()).map(Digest::as_u128)
}

pub fn fingerprint128_hex<'a>(value: impl Into<HostValue<'a>>) -> Result<String> {
    run(EntryPoint::Fingerprint128Hex, value.into()).map(encode::to_hex)
}

pub fn fingerprint128_bytes<'a>(value: impl Into<HostValue<'a>>) -> Result<Vec<u8>> {
    run(EntryPoint::Fingerprint128Bytes, value.into()).map(encode::to_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_entry_point_table() {
        for entry in EntryPoint::ALL {
            assert_eq!(EntryPoint::new(entry.width(), entry.encoding()), entry);
        }
        assert_eq!(EntryPoint::Fingerprint64Hex.name(), "fingerprint64_hex");
    }

    #[test]
    fn test_missing_argument() {
        for entry in EntryPoint::ALL {
            let err = invoke(entry, &[]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingArgument);
        }
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let args = [HostValue::Text("abc"), HostValue::Number(1.0)];
        assert_eq!(
            invoke(EntryPoint::Fingerprint32, &args).unwrap(),
            Encoded::Number(Digest::W32(0x32d1_53ff))
        );
    }

    #[test]
    fn test_unsupported_input() {
        for entry in EntryPoint::ALL {
            let err = invoke(entry, &[HostValue::Number(3.0)]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedInputType);
        }
        assert!(fingerprint32_hex(HostValue::Other("record")).is_err());
    }

    #[test]
    fn test_result_shape_follows_entry_point() {
        for entry in EntryPoint::ALL {
            let out = invoke(entry, &[HostValue::Text("hello")]).unwrap();
            assert_eq!(out.encoding(), entry.encoding());
            assert_eq!(out.decode().unwrap().width(), entry.width());
        }
    }

    #[test]
    fn test_named_wrappers_match_table() {
        let text = "hello";
        assert_eq!(
            invoke(EntryPoint::Fingerprint32, &[HostValue::Text(text)]).unwrap(),
            Encoded::Number(Digest::W32(fingerprint32(text).unwrap()))
        );
        assert_eq!(
            invoke(EntryPoint::Fingerprint64Hex, &[HostValue::Text(text)]).unwrap(),
            Encoded::Hex(fingerprint64_hex(text).unwrap())
        );
        assert_eq!(
            invoke(EntryPoint::Fingerprint128Bytes, &[HostValue::Text(text)]).unwrap(),
            Encoded::Bytes(fingerprint128_bytes(text).unwrap())
        );
        assert_eq!(
            fingerprint128(text).unwrap(),
            fingerprint_digest(Width::W128, text).unwrap().as_u128()
        );
    }

    #[test]
    fn test_empty_string_golden() {
        assert_eq!(fingerprint32("").unwrap(), 0x02cc_5d05);
        assert_eq!(fingerprint32_hex("").unwrap(), "02cc5d05");
        assert_eq!(fingerprint64_hex("").unwrap(), "ef46db3751d8e999");
        assert_eq!(
            fingerprint128_hex("").unwrap(),
            "99aa06d3014798d86001c324468d497f"
        );
    }
}
