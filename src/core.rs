use twox_hash::{XxHash32, XxHash3_128, XxHash64};

// =========================================================
//   digest engine
// =========================================================
//
// Each width uses its own xxHash function over the same bytes. These are
// not FarmHash fingerprints and do not match FarmHash output:
//   32  -> XXH32,    seed 0
//   64  -> XXH64,    seed 0
//   128 -> XXH3-128, default secret
//
// No width is a truncation or extension of another.

const SEED32: u32 = 0;
const SEED64: u64 = 0;

/// Bit-width of a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    W32,
    W64,
    W128,
}

impl Width {
    pub const ALL: [Width; 3] = [Width::W32, Width::W64, Width::W128];

    pub const fn bits(self) -> u32 {
        match self {
            Width::W32 => 32,
            Width::W64 => 64,
            Width::W128 => 128,
        }
    }

    /// Length of the raw byte encoding.
    pub const fn byte_len(self) -> usize {
        self.bits() as usize / 8
    }

    /// Length of the hex encoding.
    pub const fn hex_len(self) -> usize {
        self.bits() as usize / 4
    }

    /// Number of 32-bit words in the digest.
    pub const fn words(self) -> usize {
        self.bits() as usize / 32
    }
}

/// A fixed-width fingerprint. The variant is the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digest {
    W32(u32),
    W64(u64),
    W128(u128),
}

impl Digest {
    pub const fn width(self) -> Width {
        match self {
            Digest::W32(_) => Width::W32,
            Digest::W64(_) => Width::W64,
            Digest::W128(_) => Width::W128,
        }
    }

    /// The digest value, zero-extended.
    pub const fn as_u128(self) -> u128 {
        match self {
            Digest::W32(v) => v as u128,
            Digest::W64(v) => v as u128,
            Digest::W128(v) => v,
        }
    }

    /// Rebuild a digest of `width` from its low bits. Higher bits are dropped.
    pub const fn from_u128(value: u128, width: Width) -> Digest {
        match width {
            Width::W32 => Digest::W32(value as u32),
            Width::W64 => Digest::W64(value as u64),
            Width::W128 => Digest::W128(value),
        }
    }
}

#[inline]
pub fn digest32(bytes: &[u8]) -> u32 {
    XxHash32::oneshot(SEED32, bytes)
}

#[inline]
pub fn digest64(bytes: &[u8]) -> u64 {
    XxHash64::oneshot(SEED64, bytes)
}

#[inline]
pub fn digest128(bytes: &[u8]) -> u128 {
    XxHash3_128::oneshot(bytes)
}

/// Fingerprint `bytes` at the requested width. Any byte slice is valid,
/// including the empty one.
pub fn digest(bytes: &[u8], width: Width) -> Digest {
    match width {
        Width::W32 => Digest::W32(digest32(bytes)),
        Width::W64 => Digest::W64(digest64(bytes)),
        Width::W128 => Digest::W128(digest128(bytes)),
    }
}
