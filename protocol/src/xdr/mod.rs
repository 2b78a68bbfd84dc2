//! # XDR Binary Codec
//!
//! Every value that crosses the wire (transactions, envelopes, keys, assets)
//! is encoded with External Data Representation (RFC 4506) as profiled by the
//! ledger network. The rules are small and unforgiving:
//!
//! - integers are 4 or 8 bytes, big-endian;
//! - opaque data and strings are padded with zero bytes to a multiple of 4;
//! - variable-length data carries a `u32` length prefix, fixed-length does not;
//! - optionals are a boolean flag followed by the value;
//! - unions are a signed 32-bit discriminant followed by the selected arm.
//!
//! Model types implement [`WriteXdr`] and [`ReadXdr`] directly. There is no
//! separate "generated" type layer: the Rust enum *is* the union, and every
//! decode path matches every arm explicitly, rejecting unknown discriminants
//! with [`XdrError::UnknownVariant`].
//!
//! ## Strict decoding
//!
//! [`ReadXdr::from_xdr`] refuses input that a lenient decoder would accept:
//! non-zero padding, lengths beyond the field maximum, truncated input and
//! trailing bytes all fail. Two byte strings that decode to the same value are
//! therefore always identical, which is what makes hashes of re-encoded
//! values stable.
//!
//! ```
//! use stellar_protocol::xdr::{ReadXdr, WriteXdr};
//!
//! let bytes = 42u32.to_xdr();
//! assert_eq!(bytes, vec![0, 0, 0, 42]);
//! assert_eq!(u32::from_xdr(&bytes).unwrap(), 42);
//! ```

pub mod error;
pub mod reader;
pub mod writer;

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub use error::{Malformed, XdrError};
pub use reader::XdrReader;
pub use writer::XdrWriter;

/// Types with a canonical XDR encoding.
pub trait WriteXdr {
    /// Append this value's encoding to `w`.
    fn write_xdr(&self, w: &mut XdrWriter);

    /// Encode into a fresh byte vector.
    fn to_xdr(&self) -> Vec<u8> {
        let mut w = XdrWriter::new();
        self.write_xdr(&mut w);
        w.into_bytes()
    }

    /// Encode and wrap in standard (padded) base64.
    fn to_xdr_base64(&self) -> String {
        STANDARD.encode(self.to_xdr())
    }
}

/// Types that can be decoded from their canonical XDR encoding.
pub trait ReadXdr: Sized {
    /// Read one value from the cursor, leaving any following bytes untouched.
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError>;

    /// Decode a complete buffer. Trailing bytes are an error.
    fn from_xdr(bytes: &[u8]) -> Result<Self, XdrError> {
        let mut r = XdrReader::new(bytes);
        let value = Self::read_xdr(&mut r)?;
        r.finish()?;
        Ok(value)
    }

    /// Decode a base64-wrapped buffer.
    fn from_xdr_base64(encoded: &str) -> Result<Self, XdrError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| XdrError::InvalidBase64(e.to_string()))?;
        Self::from_xdr(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Primitive implementations
// ---------------------------------------------------------------------------

macro_rules! impl_xdr_int {
    ($ty:ty, $write:ident, $read:ident) => {
        impl WriteXdr for $ty {
            fn write_xdr(&self, w: &mut XdrWriter) {
                w.$write(*self);
            }
        }

        impl ReadXdr for $ty {
            fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
                r.$read()
            }
        }
    };
}

impl_xdr_int!(u32, write_u32, read_u32);
impl_xdr_int!(i32, write_i32, read_i32);
impl_xdr_int!(u64, write_u64, read_u64);
impl_xdr_int!(i64, write_i64, read_i64);
impl_xdr_int!(bool, write_bool, read_bool);

/// Fixed-length opaque (`opaque x[N]`), e.g. keys and hashes.
impl<const N: usize> WriteXdr for [u8; N] {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(self);
    }
}

impl<const N: usize> ReadXdr for [u8; N] {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        r.read_fixed_opaque::<N>()
    }
}

impl<T: WriteXdr> WriteXdr for Box<T> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        (**self).write_xdr(w);
    }
}

impl<T: ReadXdr> ReadXdr for Box<T> {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Box::new(T::read_xdr(r)?))
    }
}

/// Optional data (`T*`).
impl<T: WriteXdr> WriteXdr for Option<T> {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_optional(self.as_ref());
    }
}

impl<T: ReadXdr> ReadXdr for Option<T> {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        r.read_optional()
    }
}

/// Implement [`WriteXdr`] and [`ReadXdr`] for a plain struct whose fields
/// are encoded in declaration order and all implement both traits.
macro_rules! xdr_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty ),*
        }

        impl $crate::xdr::WriteXdr for $name {
            fn write_xdr(&self, w: &mut $crate::xdr::XdrWriter) {
                $( $crate::xdr::WriteXdr::write_xdr(&self.$field, w); )*
            }
        }

        impl $crate::xdr::ReadXdr for $name {
            fn read_xdr(
                r: &mut $crate::xdr::XdrReader<'_>,
            ) -> Result<Self, $crate::xdr::XdrError> {
                Ok(Self {
                    $( $field: <$ty as $crate::xdr::ReadXdr>::read_xdr(r)?, )*
                })
            }
        }
    };
}

pub(crate) use xdr_struct;
