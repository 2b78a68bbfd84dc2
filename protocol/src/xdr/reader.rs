//! Bounds-checked XDR input cursor.

use super::error::{Malformed, XdrError};
use super::ReadXdr;

/// Cursor over a borrowed XDR buffer.
///
/// Every read checks that enough input remains, so a truncated buffer
/// produces [`Malformed::Truncated`] rather than a panic.
#[derive(Debug, Clone)]
pub struct XdrReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Current offset from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u32(&mut self) -> Result<u32, XdrError> {
        Ok(u32::from_be_bytes(self.read_array::<4>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, XdrError> {
        Ok(i32::from_be_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, XdrError> {
        Ok(u64::from_be_bytes(self.read_array::<8>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, XdrError> {
        Ok(i64::from_be_bytes(self.read_array::<8>()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, XdrError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Malformed::InvalidBool(other).into()),
        }
    }

    pub fn read_discriminant(&mut self) -> Result<i32, XdrError> {
        self.read_i32()
    }

    /// Fixed-length opaque data of exactly `N` bytes plus its padding.
    pub fn read_fixed_opaque<const N: usize>(&mut self) -> Result<[u8; N], XdrError> {
        let bytes = self.read_array::<N>()?;
        self.skip_padding(N)?;
        Ok(bytes)
    }

    /// Variable-length opaque data, rejecting lengths above `max`.
    pub fn read_var_opaque(&mut self, max: u32) -> Result<Vec<u8>, XdrError> {
        let len = self.read_len(max)?;
        let bytes = self.take(len)?.to_vec();
        self.skip_padding(len)?;
        Ok(bytes)
    }

    /// XDR strings are raw bytes; no character set is imposed here.
    pub fn read_string(&mut self, max: u32) -> Result<Vec<u8>, XdrError> {
        self.read_var_opaque(max)
    }

    pub fn read_optional<T: ReadXdr>(&mut self) -> Result<Option<T>, XdrError> {
        if self.read_bool()? {
            Ok(Some(T::read_xdr(self)?))
        } else {
            Ok(None)
        }
    }

    /// Variable-length array of at most `max` elements.
    pub fn read_var_array<T: ReadXdr>(&mut self, max: u32) -> Result<Vec<T>, XdrError> {
        let len = self.read_len(max)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::read_xdr(self)?);
        }
        Ok(items)
    }

    /// Consume the reader, failing if any input is left over.
    pub fn finish(self) -> Result<(), XdrError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Malformed::TrailingBytes(n).into()),
        }
    }

    fn read_len(&mut self, max: u32) -> Result<usize, XdrError> {
        let len = self.read_u32()?;
        if len > max {
            return Err(Malformed::LengthExceedsMax { len, max }.into());
        }
        let len = len as usize;
        if len > self.remaining() {
            return Err(Malformed::Truncated {
                needed: len,
                remaining: self.remaining(),
            }
            .into());
        }
        Ok(len)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], XdrError> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], XdrError> {
        if n > self.remaining() {
            return Err(Malformed::Truncated {
                needed: n,
                remaining: self.remaining(),
            }
            .into());
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip_padding(&mut self, len: usize) -> Result<(), XdrError> {
        let padding = (4 - len % 4) % 4;
        let start = self.pos;
        let bytes = self.take(padding)?;
        if let Some(idx) = bytes.iter().position(|b| *b != 0) {
            return Err(Malformed::NonZeroPadding { offset: start + idx }.into());
        }
        Ok(())
    }
}
