//! Output encodings for a digest.
//!
//! Hex output is order-normalized: the digest is split into 32-bit words and
//! the most significant word is written first, on every platform. Byte output
//! is NOT normalized: it is the digest's native in-memory layout, so the same
//! digest yields different bytes on little- and big-endian hosts. Use hex when
//! the result has to be portable.

use crate::core::{Digest, Width};
use crate::error::{FingerprintError, Result};

/// Result representation, fixed by the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Number,
    Hex,
    Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// The digest value itself. Only the 32-bit value is exact in hosts whose
    /// numbers are IEEE-754 doubles.
    Number(Digest),
    /// Lowercase hex, `width / 4` characters.
    Hex(String),
    /// Native-order bytes, `width / 8` of them.
    Bytes(Vec<u8>),
}

impl Encoded {
    pub fn encoding(&self) -> Encoding {
        match self {
            Encoded::Number(_) => Encoding::Number,
            Encoded::Hex(_) => Encoding::Hex,
            Encoded::Bytes(_) => Encoding::Bytes,
        }
    }

    /// Recover the digest. The width is implied by the encoded length.
    pub fn decode(&self) -> Result<Digest> {
        match self {
            Encoded::Number(digest) => Ok(*digest),
            Encoded::Hex(hex) => {
                let width = width_for(hex.len(), Width::hex_len).ok_or_else(|| {
                    FingerprintError::malformed(format!("{} hex digits", hex.len()))
                })?;
                decode_hex(hex, width)
            }
            Encoded::Bytes(bytes) => {
                let width = width_for(bytes.len(), Width::byte_len).ok_or_else(|| {
                    FingerprintError::malformed(format!("{} bytes", bytes.len()))
                })?;
                from_native_bytes(bytes, width)
            }
        }
    }
}

fn width_for(len: usize, measure: fn(Width) -> usize) -> Option<Width> {
    Width::ALL.into_iter().find(|w| measure(*w) == len)
}

pub fn encode(digest: Digest, encoding: Encoding) -> Encoded {
    match encoding {
        Encoding::Number => Encoded::Number(digest),
        Encoding::Hex => Encoded::Hex(to_hex(digest)),
        Encoding::Bytes => Encoded::Bytes(to_bytes(digest)),
    }
}

/// Lowercase hex with big-endian word order.
pub fn to_hex(digest: Digest) -> String {
    let value = digest.as_u128();
    let words = digest.width().words();
    let mut buf = Vec::with_capacity(words * 4);
    for i in (0..words).rev() {
        let word = ((value >> (i * 32)) & 0xffff_ffff) as u32;
        buf.extend_from_slice(&word.to_be_bytes());
    }
    hex::encode(buf)
}

/// Digest bits in the host's native byte order.
pub fn to_bytes(digest: Digest) -> Vec<u8> {
    match digest {
        Digest::W32(v) => v.to_ne_bytes().to_vec(),
        Digest::W64(v) => v.to_ne_bytes().to_vec(),
        Digest::W128(v) => v.to_ne_bytes().to_vec(),
    }
}

/// Parse a hex digest written by [`to_hex`]. Either letter case is accepted.
pub fn decode_hex(hex: &str, width: Width) -> Result<Digest> {
    if hex.len() != width.hex_len() {
        return Err(FingerprintError::malformed(format!(
            "expected {} hex digits for a {}-bit digest, got {}",
            width.hex_len(),
            width.bits(),
            hex.len()
        )));
    }
    let bytes = hex::decode(hex).map_err(|e| FingerprintError::malformed(e.to_string()))?;
    let value = bytes
        .chunks_exact(4)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
        .fold(0u128, |acc, word| (acc << 32) | word as u128);
    Ok(Digest::from_u128(value, width))
}

/// Reinterpret native-order bytes written by [`to_bytes`].
pub fn from_native_bytes(bytes: &[u8], width: Width) -> Result<Digest> {
    let malformed = || {
        FingerprintError::malformed(format!(
            "expected {} bytes for a {}-bit digest, got {}",
            width.byte_len(),
            width.bits(),
            bytes.len()
        ))
    };
    let digest = match width {
        Width::W32 => Digest::W32(u32::from_ne_bytes(bytes.try_into().map_err(|_| malformed())?)),
        Width::W64 => Digest::W64(u64::from_ne_bytes(bytes.try_into().map_err(|_| malformed())?)),
        Width::W128 => {
            Digest::W128(u128::from_ne_bytes(bytes.try_into().map_err(|_| malformed())?))
        }
    };
    Ok(digest)
}
