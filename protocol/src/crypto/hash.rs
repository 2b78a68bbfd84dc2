//! # Hashing Utilities
//!
//! The ledger network uses exactly one hash function for identifiers:
//! SHA-256. Transaction hashes, network IDs, pool IDs, claimable balance IDs
//! and hash-x signers are all SHA-256 digests of some canonical XDR.
//!
//! HMAC-SHA512 is here too, but only as the PRF behind SLIP-10 key
//! derivation (see [`super::slip10`]).

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use stellar_protocol::crypto::sha256;
///
/// let hash = sha256(b"abc");
/// assert_eq!(hash[0], 0xba);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of the concatenation of several slices, without building the
/// concatenated buffer first.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Lower-case hex SHA-256, mainly for logs and test vectors.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// HMAC-SHA512 keyed with `key` over the concatenation of `parts`.
///
/// HMAC accepts keys of any length, so construction cannot fail in practice;
/// the `Option` keeps that guarantee out of `expect` territory.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Option<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).ok()?;
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    Some(out)
}
