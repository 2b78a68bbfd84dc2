//! Asset code validation and padding.
//!
//! Codes are 1 to 12 ASCII alphanumeric characters, stored right-padded with
//! zero bytes in a 4- or 12-byte field. On the way in from the wire we are
//! strict: the bytes must be a non-empty alphanumeric prefix followed only
//! by zeros, and a 12-byte code must be longer than 4 characters.

use super::AssetError;

pub const ALPHANUM4_MAX_LEN: usize = 4;
pub const ALPHANUM12_MAX_LEN: usize = 12;

/// Check a code typed by a user.
pub fn validate(code: &str) -> Result<(), AssetError> {
    let valid = (1..=ALPHANUM12_MAX_LEN).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(AssetError::InvalidAssetCode(code.to_string()))
    }
}

/// Right-pad `code` with zeros. The caller has validated the length.
pub fn pad<const N: usize>(code: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let len = code.len().min(N);
    out[..len].copy_from_slice(&code.as_bytes()[..len]);
    out
}

/// Recover the code text from its padded wire form.
pub fn unpad(bytes: &[u8]) -> Result<String, AssetError> {
    let len = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    let (code, padding) = bytes.split_at(len);
    let well_formed = !code.is_empty()
        && code.iter().all(u8::is_ascii_alphanumeric)
        && padding.iter().all(|b| *b == 0);
    if !well_formed {
        return Err(AssetError::InvalidAssetCode(
            String::from_utf8_lossy(bytes).into_owned(),
        ));
    }
    // ASCII alphanumeric is valid UTF-8.
    Ok(code.iter().map(|b| char::from(*b)).collect())
}
