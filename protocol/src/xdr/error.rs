//! Error types for the XDR codec.
//!
//! Decoding is the only fallible direction: every value this crate can
//! construct already satisfies the wire limits, so encoding never fails.

use thiserror::Error;

/// Structural problems found while decoding raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// The input ended before the value was complete.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the decoder tried to consume.
        needed: usize,
        /// Bytes actually left in the input.
        remaining: usize,
    },

    /// A padding byte after variable-length data was not zero.
    #[error("non-zero padding byte at offset {offset}")]
    NonZeroPadding {
        /// Absolute offset of the offending byte.
        offset: usize,
    },

    /// A length prefix exceeded the declared maximum for the field.
    #[error("length {len} exceeds maximum {max}")]
    LengthExceedsMax {
        /// Length read from the wire.
        len: u32,
        /// Maximum allowed by the type.
        max: u32,
    },

    /// Bytes remained after the top-level value was decoded.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A boolean was encoded as something other than 0 or 1.
    #[error("invalid boolean encoding {0}")]
    InvalidBool(u32),
}

/// Errors raised by the XDR reader and the `ReadXdr` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XdrError {
    /// The bytes do not follow the wire format rules.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] Malformed),

    /// A union discriminant does not name any known arm.
    #[error("unknown discriminant {discriminant} for {type_name}")]
    UnknownVariant {
        /// The union being decoded.
        type_name: &'static str,
        /// The discriminant found on the wire.
        discriminant: i32,
    },

    /// The bytes are well-formed but describe a value the model forbids
    /// (a misordered pool pair, an invalid asset code, ...).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The base64 wrapper around the XDR could not be decoded.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

impl XdrError {
    /// Shorthand for an [`XdrError::UnknownVariant`].
    pub fn unknown_variant(type_name: &'static str, discriminant: i32) -> Self {
        Self::UnknownVariant {
            type_name,
            discriminant,
        }
    }

    /// True for structural (wire-level) decoding failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEncoding(_))
    }
}
