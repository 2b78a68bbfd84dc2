//! Append-only XDR output buffer.

use super::WriteXdr;

/// Accumulates the canonical XDR encoding of one or more values.
///
/// All integers are written big-endian. Opaque data is followed by zero
/// padding up to the next multiple of four bytes.
#[derive(Debug, Default, Clone)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    /// Union discriminants are plain signed 32-bit integers on the wire.
    pub fn write_discriminant(&mut self, discriminant: i32) {
        self.write_i32(discriminant);
    }

    /// Fixed-length opaque data: no length prefix, padded to four bytes.
    pub fn write_fixed_opaque(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.pad(bytes.len());
    }

    /// Variable-length opaque data: `u32` length, bytes, padding.
    ///
    /// Callers guarantee the length fits the field's declared maximum; the
    /// model types enforce those limits when they are constructed.
    pub fn write_var_opaque(&mut self, bytes: &[u8]) {
        self.write_len(bytes.len());
        self.write_fixed_opaque(bytes);
    }

    /// XDR strings share the variable opaque layout.
    pub fn write_string(&mut self, bytes: &[u8]) {
        self.write_var_opaque(bytes);
    }

    /// Optional values: a boolean presence flag followed by the value.
    pub fn write_optional<T: WriteXdr>(&mut self, value: Option<&T>) {
        match value {
            Some(inner) => {
                self.write_bool(true);
                inner.write_xdr(self);
            }
            None => self.write_bool(false),
        }
    }

    /// Variable-length arrays: `u32` element count followed by each element.
    pub fn write_var_array<T: WriteXdr>(&mut self, items: &[T]) {
        self.write_len(items.len());
        for item in items {
            item.write_xdr(self);
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn write_len(&mut self, len: usize) {
        // Every bounded field in the model is far below u32::MAX.
        self.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    fn pad(&mut self, len: usize) {
        let padding = (4 - len % 4) % 4;
        self.buf.extend(std::iter::repeat(0u8).take(padding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut w = XdrWriter::new();
        w.write_u32(1);
        w.write_i32(-1);
        w.write_u64(0x0102_0304_0506_0708);
        assert_eq!(
            w.into_bytes(),
            vec![0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn var_opaque_is_length_prefixed_and_padded() {
        let mut w = XdrWriter::new();
        w.write_var_opaque(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee]);
        assert_eq!(
            w.into_bytes(),
            vec![0, 0, 0, 5, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0, 0, 0]
        );
    }

    #[test]
    fn fixed_opaque_of_aligned_length_has_no_padding() {
        let mut w = XdrWriter::new();
        w.write_fixed_opaque(&[1, 2, 3, 4]);
        assert_eq!(w.len(), 4);
    }

    #[test]
    fn optional_writes_presence_flag() {
        let mut w = XdrWriter::new();
        w.write_optional(Some(&7u32));
        w.write_optional::<u32>(None);
        assert_eq!(w.into_bytes(), vec![0, 0, 0, 1, 0, 0, 0, 7, 0, 0, 0, 0]);
    }
}
