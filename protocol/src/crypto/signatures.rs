//! # Decorated Signatures & Hints
//!
//! A transaction envelope does not say *who* signed it. Each signature is
//! "decorated" with a 4-byte hint so validators can match it against the
//! account's signer list without trying every key.
//!
//! Hints are pure functions of public data, so they can be computed for a
//! signer whose secret key we never see:
//!
//! - ed25519 signer: the last 4 bytes of the public key (equivalently of its
//!   XDR `PublicKey`, whose last bytes are the key's);
//! - signed-payload signer: the key hint XOR the last 4 bytes of the payload
//!   (a payload shorter than 4 bytes is left-aligned in a zeroed buffer);
//! - hash-x signer: the last 4 bytes of `sha256(preimage)`.
//!
//! Verification never panics and never returns an error: any structural
//! problem (wrong signature length, a key that is not a curve point) is just
//! `false`.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::hash::sha256;
use crate::config::SIGNATURE_MAX_BYTES;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

/// The 4-byte signer hint attached to every decorated signature.
pub type SignatureHint = [u8; 4];

/// Errors constructing signature values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature too long: {len} bytes, maximum is 64")]
    TooLong { len: usize },
}

/// A signature plus the hint identifying its signer (`DecoratedSignature`).
///
/// The signature bytes are at most 64 long. For ed25519 signers they are the
/// 64-byte signature; for hash-x signers they are the preimage itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecoratedSignature {
    hint: SignatureHint,
    signature: Vec<u8>,
}

impl DecoratedSignature {
    pub fn new(hint: SignatureHint, signature: Vec<u8>) -> Result<Self, SignatureError> {
        if signature.len() > SIGNATURE_MAX_BYTES {
            return Err(SignatureError::TooLong {
                len: signature.len(),
            });
        }
        Ok(Self { hint, signature })
    }

    /// Wrap a full ed25519 signature, which always fits.
    pub fn from_ed25519(hint: SignatureHint, signature: [u8; 64]) -> Self {
        Self {
            hint,
            signature: signature.to_vec(),
        }
    }

    pub fn hint(&self) -> SignatureHint {
        self.hint
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl WriteXdr for DecoratedSignature {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.hint);
        w.write_var_opaque(&self.signature);
    }
}

impl ReadXdr for DecoratedSignature {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let hint = r.read_fixed_opaque::<4>()?;
        let signature = r.read_var_opaque(SIGNATURE_MAX_BYTES as u32)?;
        Ok(Self { hint, signature })
    }
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

/// Hint for an ed25519 signer: the key's last four bytes.
pub fn ed25519_hint(public_key: &[u8; 32]) -> SignatureHint {
    last_four(public_key)
}

/// Hint for an ed25519 signed-payload signer.
///
/// ```
/// use stellar_protocol::crypto::signatures::signed_payload_hint;
///
/// let mut key = [0u8; 32];
/// key[28..].copy_from_slice(&[254, 66, 4, 55]);
/// assert_eq!(signed_payload_hint(&key, &[1, 2, 3]), [255, 64, 7, 55]);
/// ```
pub fn signed_payload_hint(public_key: &[u8; 32], payload: &[u8]) -> SignatureHint {
    let mut payload_hint = [0u8; 4];
    if payload.len() >= 4 {
        payload_hint = last_four(payload);
    } else {
        payload_hint[..payload.len()].copy_from_slice(payload);
    }
    let key_hint = ed25519_hint(public_key);
    let mut hint = [0u8; 4];
    hint.iter_mut()
        .zip(key_hint.iter().zip(payload_hint.iter()))
        .for_each(|(h, (k, p))| *h = k ^ p);
    hint
}

/// Hint for a hash-x signer: the tail of the preimage's SHA-256.
pub fn hash_x_hint(preimage: &[u8]) -> SignatureHint {
    last_four(&sha256(preimage))
}

fn last_four(bytes: &[u8]) -> SignatureHint {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes[bytes.len() - 4..]);
    out
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an ed25519 `signature` over `message` by `public_key`.
///
/// Returns `false` for a malformed key or a signature that is not exactly
/// 64 bytes; never panics.
pub fn verify(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(&sig_bytes);
    verifying_key.verify(message, &sig).is_ok()
}
