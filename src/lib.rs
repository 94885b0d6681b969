//! Deterministic 32, 64 and 128-bit fingerprints of byte content.
//!
//! The values are xxHash (XXH32 and XXH64 with seed 0, XXH3-128 with the
//! default secret). They are NOT FarmHash fingerprints and will not match
//! output from a FarmHash-based implementation.
//!
//! ```
//! assert_eq!(fingerprint::fingerprint32_hex("").unwrap(), "02cc5d05");
//! ```

pub mod core;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod input;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{digest, Digest, Width};
pub use dispatch::{
    fingerprint, fingerprint128, fingerprint128_bytes, fingerprint128_hex, fingerprint32,
    fingerprint32_bytes, fingerprint32_hex, fingerprint64, fingerprint64_bytes, fingerprint64_hex,
    fingerprint_digest, invoke, EntryPoint,
};
pub use encode::{Encoded, Encoding};
pub use error::{ErrorKind, FingerprintError, Result};
pub use input::{adapt, ByteSequence, HostValue};

/// Convenience: fingerprint raw bytes to portable hex
pub fn hex_digest(data: &[u8], width: Width) -> String {
    encode::to_hex(digest(data, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_fingerprint() {
        let msg = b"hello world";
        let d = digest(msg, Width::W64);
        assert_eq!(d.width(), Width::W64);
        assert_eq!(fingerprint64(msg).unwrap() as u128, d.as_u128());
    }

    #[test]
    fn test_hex_digest() {
        for width in Width::ALL {
            let hex = hex_digest(b"test", width);
            assert_eq!(hex.len(), width.hex_len());
            assert_eq!(hex, fingerprint_digest(width, "test").map(encode::to_hex).unwrap());
        }
    }
}
