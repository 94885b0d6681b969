//! Error types for fingerprint entry points.

use thiserror::Error;

/// Error raised by a fingerprint entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// The entry point was called without a value.
    #[error("invalid number of arguments: expected a value to fingerprint")]
    MissingArgument,

    /// The value is not text or a binary buffer.
    #[error(
        "first argument must be text or a binary buffer (bytes, buffer view or growable buffer), got {found}"
    )]
    UnsupportedInputType { found: String },

    /// A hex string or byte sequence does not hold a digest of the expected width.
    #[error("malformed digest encoding: {0}")]
    MalformedDigest(String),
}

/// Discriminant of [`FingerprintError`], for branching without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingArgument,
    UnsupportedInputType,
    MalformedDigest,
}

impl FingerprintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FingerprintError::MissingArgument => ErrorKind::MissingArgument,
            FingerprintError::UnsupportedInputType { .. } => ErrorKind::UnsupportedInputType,
            FingerprintError::MalformedDigest(_) => ErrorKind::MalformedDigest,
        }
    }

    #[must_use]
    pub fn unsupported(found: impl Into<String>) -> Self {
        Self::UnsupportedInputType {
            found: found.into(),
        }
    }

    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDigest(msg.into())
    }
}

/// Result type alias using [`FingerprintError`].
pub type Result<T> = std::result::Result<T, FingerprintError>;
